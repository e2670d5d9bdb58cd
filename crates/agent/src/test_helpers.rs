//! Shared test helpers for responder tests.

use askdesk_core::error::{HistoryError, ProviderError};
use askdesk_core::history::HistoryStore;
use askdesk_core::message::Message;
use askdesk_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use askdesk_core::record::ChatRecord;
use std::sync::Mutex;

/// A mock provider that always answers with the same text and remembers
/// every request it received.
pub struct RecordingProvider {
    reply: Result<String, ProviderError>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl RecordingProvider {
    pub fn answering(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl Provider for RecordingProvider {
    fn name(&self) -> &str {
        "recording_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);
        let text = self.reply.clone()?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
        })
    }
}

/// A history sink whose every append fails.
pub struct BrokenHistory;

#[async_trait::async_trait]
impl HistoryStore for BrokenHistory {
    fn name(&self) -> &str {
        "broken"
    }

    async fn append(&self, _record: &ChatRecord) -> Result<(), HistoryError> {
        Err(HistoryError::Storage("No space left on device".into()))
    }
}
