//! The responder: one question in, one recorded answer out.

use std::sync::Arc;

use askdesk_config::AppConfig;
use askdesk_core::error::{HistoryError, Result};
use askdesk_core::history::HistoryStore;
use askdesk_core::message::Message;
use askdesk_core::provider::{Provider, ProviderRequest};
use askdesk_core::record::{ChatRecord, Source};
use askdesk_history::JsonlHistory;
use askdesk_knowledge::KnowledgeBase;
use tracing::{debug, info, warn};

use crate::remote::RemoteAnswer;

/// Tunables for answering, fixed at startup.
#[derive(Debug, Clone)]
pub struct ResponderSettings {
    /// Remote model identifier
    pub model: String,
    /// Cap on generated tokens for a fallback answer
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    /// System instruction sent ahead of the user's question
    pub system_prompt: String,
    /// Minimum similarity for a knowledge-base answer
    pub threshold: f64,
}

impl ResponderSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.provider.model.clone(),
            max_tokens: config.provider.max_tokens,
            temperature: config.provider.temperature,
            system_prompt: config.provider.system_prompt.clone(),
            threshold: config.matching.threshold,
        }
    }
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Answers questions from the knowledge base or the remote provider and
/// records every exchange.
pub struct Responder {
    knowledge: Arc<KnowledgeBase>,
    provider: Arc<dyn Provider>,
    history: Arc<dyn HistoryStore>,
    settings: ResponderSettings,
}

impl Responder {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        provider: Arc<dyn Provider>,
        history: Arc<dyn HistoryStore>,
        settings: ResponderSettings,
    ) -> Self {
        Self {
            knowledge,
            provider,
            history,
            settings,
        }
    }

    /// Build the production pipeline: configured knowledge, provider, and
    /// the JSONL history file.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let history: Arc<dyn HistoryStore> = Arc::new(JsonlHistory::new(&config.history.path));
        Self::from_config_with_history(config, history)
    }

    /// Like [`Responder::from_config`] but with a caller-supplied history sink.
    pub fn from_config_with_history(
        config: &AppConfig,
        history: Arc<dyn HistoryStore>,
    ) -> Result<Self> {
        let knowledge = Arc::new(KnowledgeBase::from_config(&config.knowledge));
        let provider = askdesk_providers::build_from_config(config)?;
        Ok(Self::new(
            knowledge,
            provider,
            history,
            ResponderSettings::from_config(config),
        ))
    }

    pub fn settings(&self) -> &ResponderSettings {
        &self.settings
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Answer `question`, record the exchange, and return the record.
    ///
    /// `question` is kept verbatim in the record and sent verbatim to the
    /// remote provider; only the matcher sees the normalized form.
    pub async fn respond(&self, question: &str) -> std::result::Result<ChatRecord, HistoryError> {
        let record = self.answer(question).await;

        if let Err(e) = self.history.append(&record).await {
            warn!(error = %e, history = %self.history.name(), "Failed to record chat history");
            return Err(e);
        }

        Ok(record)
    }

    /// Answer without recording.
    pub async fn answer(&self, question: &str) -> ChatRecord {
        if let Some(hit) = self.knowledge.lookup(question, self.settings.threshold) {
            info!(
                score = hit.score,
                matched = %hit.entry.question,
                "Answered from knowledge base"
            );
            return ChatRecord::new(question, &hit.entry.answer, Source::KnowledgeBase);
        }

        debug!(
            threshold = self.settings.threshold,
            "No knowledge entry close enough, falling back to remote model"
        );

        let (answer, source) = self.ask_remote(question).await.into_parts();
        ChatRecord::new(question, answer, source)
    }

    /// Ask the remote provider. Never fails: errors become
    /// [`RemoteAnswer::Failure`].
    pub async fn ask_remote(&self, question: &str) -> RemoteAnswer {
        let request = ProviderRequest {
            model: self.settings.model.clone(),
            messages: vec![
                Message::system(&self.settings.system_prompt),
                Message::user(question),
            ],
            temperature: self.settings.temperature,
            max_tokens: Some(self.settings.max_tokens),
        };

        let outcome: RemoteAnswer = self
            .provider
            .complete(request)
            .await
            .map(|response| response.message.content)
            .into();

        match &outcome {
            RemoteAnswer::Completion(text) => {
                info!(provider = %self.provider.name(), chars = text.len(), "Answered by remote model")
            }
            RemoteAnswer::Failure(description) => {
                warn!(provider = %self.provider.name(), error = %description, "Remote completion failed")
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::WARNING_PREFIX;
    use crate::test_helpers::{BrokenHistory, RecordingProvider};
    use askdesk_core::Role;
    use askdesk_core::error::ProviderError;
    use askdesk_history::InMemoryHistory;

    fn responder_with(
        provider: Arc<RecordingProvider>,
        history: Arc<dyn HistoryStore>,
    ) -> Responder {
        Responder::new(
            Arc::new(KnowledgeBase::default()),
            provider,
            history,
            ResponderSettings::default(),
        )
    }

    #[tokio::test]
    async fn knowledge_hit_skips_remote_call() {
        let provider = Arc::new(RecordingProvider::answering("should not be used"));
        let history = Arc::new(InMemoryHistory::new());
        let responder = responder_with(provider.clone(), history.clone());

        let record = responder
            .respond("How can I improve team productivity?")
            .await
            .unwrap();

        assert_eq!(
            record.answer,
            "Use daily stand-ups, set clear OKRs, and encourage time-blocking."
        );
        assert_eq!(record.source, Source::KnowledgeBase);
        assert_eq!(provider.call_count(), 0);
        assert_eq!(history.records().await, vec![record]);
    }

    #[tokio::test]
    async fn miss_falls_back_to_remote_with_original_question() {
        let provider = Arc::new(RecordingProvider::answering("Paris is the capital of France."));
        let history = Arc::new(InMemoryHistory::new());
        let responder = responder_with(provider.clone(), history.clone());

        let question = "  what is the capital of France  ";
        let record = responder.respond(question).await.unwrap();

        assert_eq!(record.question, question);
        assert_eq!(record.answer, "Paris is the capital of France.");
        assert_eq!(record.source, Source::RemoteModel);

        let request = provider.last_request().unwrap();
        assert_eq!(request.model, "openai/gpt-4o-mini");
        assert_eq!(request.max_tokens, Some(150));
        assert_eq!(request.temperature, None);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(
            request.messages[0].content,
            "You are a helpful assistant that answers professional questions clearly."
        );
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, question);

        assert_eq!(history.len().await, 1);
    }

    #[tokio::test]
    async fn remote_failure_becomes_error_answer() {
        let provider = Arc::new(RecordingProvider::failing(ProviderError::AuthenticationFailed(
            "Invalid API key".into(),
        )));
        let history = Arc::new(InMemoryHistory::new());
        let responder = responder_with(provider, history.clone());

        let record = responder.respond("what is the capital of France").await.unwrap();

        assert!(record.answer.starts_with(WARNING_PREFIX));
        assert!(record.answer.contains("Invalid API key"));
        assert_eq!(record.source, Source::Error);
        assert_eq!(history.records().await[0].source, Source::Error);
    }

    #[tokio::test]
    async fn punctuation_only_question_goes_remote() {
        let provider = Arc::new(RecordingProvider::answering("Could you clarify?"));
        let responder = responder_with(provider.clone(), Arc::new(InMemoryHistory::new()));

        let record = responder.respond("???").await.unwrap();
        assert_eq!(record.source, Source::RemoteModel);
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().messages[1].content, "???");
    }

    #[tokio::test]
    async fn empty_question_goes_remote() {
        let provider = Arc::new(RecordingProvider::answering("Please ask a question."));
        let responder = responder_with(provider.clone(), Arc::new(InMemoryHistory::new()));

        let record = responder.respond("").await.unwrap();
        assert_eq!(record.question, "");
        assert_eq!(record.source, Source::RemoteModel);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn threshold_is_configurable() {
        let provider = Arc::new(RecordingProvider::answering("remote"));
        let settings = ResponderSettings {
            threshold: 1.0,
            ..ResponderSettings::default()
        };
        let responder = Responder::new(
            Arc::new(KnowledgeBase::default()),
            provider.clone(),
            Arc::new(InMemoryHistory::new()),
            settings,
        );

        // 0.90 similarity: good enough at 0.75, not at 1.0
        let record = responder.respond("how do i avoid burnout").await.unwrap();
        assert_eq!(record.source, Source::RemoteModel);

        let record = responder.respond("How to avoid burnout?").await.unwrap();
        assert_eq!(record.source, Source::KnowledgeBase);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn score_equal_to_threshold_is_a_hit() {
        use askdesk_knowledge::KnowledgeEntry;

        let provider = Arc::new(RecordingProvider::answering("remote"));
        let settings = ResponderSettings {
            threshold: 0.75,
            ..ResponderSettings::default()
        };
        // ratio("abcd", "bcde") == 0.75 exactly
        let responder = Responder::new(
            Arc::new(KnowledgeBase::new([KnowledgeEntry::new("bcde", "hit")])),
            provider.clone(),
            Arc::new(InMemoryHistory::new()),
            settings,
        );

        let record = responder.respond("abcd").await.unwrap();
        assert_eq!(record.answer, "hit");
        assert_eq!(record.source, Source::KnowledgeBase);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn history_failure_is_returned() {
        let provider = Arc::new(RecordingProvider::answering("unused"));
        let responder = responder_with(provider, Arc::new(BrokenHistory));

        let err = responder.respond("How to avoid burnout?").await.unwrap_err();
        assert!(err.to_string().contains("No space left on device"));
    }

    #[tokio::test]
    async fn answer_does_not_record() {
        let history = Arc::new(InMemoryHistory::new());
        let responder = responder_with(
            Arc::new(RecordingProvider::answering("unused")),
            history.clone(),
        );

        let record = responder.answer("Tips for remote work?").await;
        assert_eq!(record.source, Source::KnowledgeBase);
        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn one_jsonl_line_per_exchange() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_history.json");
        let responder = responder_with(
            Arc::new(RecordingProvider::answering("Paris.")),
            Arc::new(JsonlHistory::new(&path)),
        );

        responder.respond("How to avoid burnout?").await.unwrap();
        responder.respond("what is the capital of France").await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let records: Vec<ChatRecord> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, Source::KnowledgeBase);
        assert_eq!(records[1].answer, "Paris.");
    }

    #[test]
    fn from_config_without_api_key_still_builds() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.history.path = dir.path().join("history.jsonl");

        let responder = Responder::from_config(&config).unwrap();
        assert_eq!(responder.provider_name(), "openrouter");
        assert_eq!(responder.knowledge().len(), 8);
        assert_eq!(responder.settings().max_tokens, 150);
    }
}
