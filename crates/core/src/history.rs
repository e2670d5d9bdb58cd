//! History trait — the append-only sink every answered question goes to.
//!
//! Records are written once and never read back, updated, or deleted by the
//! service itself.

use async_trait::async_trait;

use crate::error::HistoryError;
use crate::record::ChatRecord;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Name of this backend (e.g., "jsonl", "in_memory").
    fn name(&self) -> &str;

    /// Append one record. Implementations must make the record durable to
    /// the extent their medium allows before returning.
    async fn append(&self, record: &ChatRecord) -> Result<(), HistoryError>;
}
