//! JSON-lines history file.
//!
//! Each line is one JSON-encoded `ChatRecord`. The file is opened in append
//! mode for every write and created if absent; nothing in the service ever
//! reads it back, truncates it, or rotates it.
//!
//! Default location: `./chat_history.json`

use std::path::{Path, PathBuf};

use askdesk_core::error::HistoryError;
use askdesk_core::history::HistoryStore;
use askdesk_core::record::ChatRecord;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Append-only JSONL history file.
///
/// Appends from this process go through a single lock, so concurrent
/// requests never interleave partial lines.
pub struct JsonlHistory {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlHistory {
    /// History at `path`. Nothing touches the disk until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(path = %path.display(), "JSONL history configured");
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encode one record as a single line, newline included.
    ///
    /// serde_json writes non-ASCII as raw UTF-8 and escapes embedded
    /// newlines, so the result is always exactly one line.
    fn encode_line(record: &ChatRecord) -> Result<String, HistoryError> {
        let mut line =
            serde_json::to_string(record).map_err(|e| HistoryError::Encode(e.to_string()))?;
        line.push('\n');
        Ok(line)
    }
}

#[async_trait]
impl HistoryStore for JsonlHistory {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn append(&self, record: &ChatRecord) -> Result<(), HistoryError> {
        let line = Self::encode_line(record)?;
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                HistoryError::Storage(format!("Failed to create history directory: {e}"))
            })?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                HistoryError::Storage(format!(
                    "Failed to open history file {}: {e}",
                    self.path.display()
                ))
            })?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to write history record: {e}")))?;
        file.flush()
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to flush history file: {e}")))?;

        debug!(path = %self.path.display(), source = %record.source, "History record appended");
        Ok(())
    }
}
