//! The question answering pipeline — the heart of Askdesk.
//!
//! Every question follows the same path:
//!
//! 1. **Match** the trimmed, normalized question against the knowledge base
//! 2. **If the best score reaches the threshold**: answer from the knowledge base
//! 3. **Otherwise**: ask the remote completion provider with the original question
//! 4. **Record** the exchange in the history sink
//! 5. **Return** the record to the caller
//!
//! Remote failures never escape step 3; they become the answer text.
//! Only a history failure makes [`Responder::respond`] return an error.

pub mod remote;
pub mod responder;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use remote::{RemoteAnswer, WARNING_PREFIX};
pub use responder::{Responder, ResponderSettings};
