//! The chat record: the value returned to the caller and appended to history.

use serde::{Deserialize, Serialize};

/// Where an answer came from.
///
/// The serialized names are part of the HTTP contract and of every history
/// line ever written, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// A predefined knowledge-base entry matched the question.
    #[serde(rename = "Knowledge Base")]
    KnowledgeBase,

    /// The remote completion model produced the answer.
    #[serde(rename = "OpenAI")]
    RemoteModel,

    /// The remote call failed; the answer carries the error text.
    #[serde(rename = "Error")]
    Error,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::KnowledgeBase => "Knowledge Base",
            Source::RemoteModel => "OpenAI",
            Source::Error => "Error",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// The question exactly as received (not normalized)
    pub question: String,

    /// The answer text
    pub answer: String,

    /// Where the answer came from
    pub source: Source,
}

impl ChatRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, source: Source) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            source,
        }
    }
}
