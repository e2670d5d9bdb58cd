//! In-memory history — useful for testing and the `ask` command's dry runs.

use askdesk_core::error::HistoryError;
use askdesk_core::history::HistoryStore;
use askdesk_core::record::ChatRecord;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// A history sink that keeps records in a Vec.
pub struct InMemoryHistory {
    records: RwLock<Vec<ChatRecord>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of everything appended so far, oldest first.
    pub async fn records(&self) -> Vec<ChatRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn append(&self, record: &ChatRecord) -> Result<(), HistoryError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }
}
