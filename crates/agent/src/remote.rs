//! Outcome of the remote fallback call.

use askdesk_core::error::ProviderError;
use askdesk_core::record::Source;

/// Prefix of every answer produced from a failed remote call.
pub const WARNING_PREFIX: &str = "⚠️ Could not fetch AI response: ";

/// What the remote fallback produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAnswer {
    /// The first choice's message content, verbatim.
    Completion(String),
    /// A description of why the call failed.
    Failure(String),
}

impl RemoteAnswer {
    /// Answer text and source tag for the chat record.
    pub fn into_parts(self) -> (String, Source) {
        match self {
            RemoteAnswer::Completion(text) => (text, Source::RemoteModel),
            RemoteAnswer::Failure(description) => {
                (format!("{WARNING_PREFIX}{description}"), Source::Error)
            }
        }
    }
}

impl From<Result<String, ProviderError>> for RemoteAnswer {
    fn from(result: Result<String, ProviderError>) -> Self {
        match result {
            Ok(text) => RemoteAnswer::Completion(text),
            Err(e) => RemoteAnswer::Failure(e.to_string()),
        }
    }
}
