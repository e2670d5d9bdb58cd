//! Chat history sinks for Askdesk.

pub mod in_memory;
pub mod jsonl;

pub use in_memory::InMemoryHistory;
pub use jsonl::JsonlHistory;
