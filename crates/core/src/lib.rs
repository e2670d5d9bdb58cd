//! # Askdesk Core
//!
//! Domain types, traits, and error definitions for the Askdesk
//! question-answering service. This crate has **zero framework dependencies**:
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two outward-facing subsystems (the remote completion backend and the
//! chat history sink) are defined as traits here. Implementations live in
//! `askdesk-providers` and `askdesk-history`, which keeps the orchestration
//! in `askdesk-agent` testable with mock implementations.

pub mod error;
pub mod history;
pub mod message;
pub mod provider;
pub mod record;

// Re-export key types at crate root for ergonomics
pub use error::{Error, HistoryError, ProviderError, Result};
pub use history::HistoryStore;
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use record::{ChatRecord, Source};
