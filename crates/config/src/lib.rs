//! Configuration loading, validation, and management for Askdesk.
//!
//! Loads configuration from `./askdesk.toml` (or an explicit path) with
//! environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "askdesk.toml";

/// System instruction sent ahead of every fallback question.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers professional questions clearly.";

/// The root configuration structure.
///
/// Maps directly to `askdesk.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the remote completion provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Remote completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Knowledge-base matching settings
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Chat history settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Predefined question/answer pairs, in tie-break order
    #[serde(default = "default_knowledge")]
    pub knowledge: Vec<KnowledgeEntryConfig>,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("matching", &self.matching)
            .field("history", &self.history)
            .field("gateway", &self.gateway)
            .field("knowledge", &self.knowledge.len())
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Label used in logs
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Base URL of an OpenAI-compatible API (without `/chat/completions`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Cap on generated tokens per answer
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature; the provider default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Request timeout in seconds; no timeout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_provider_name() -> String {
    "openrouter".into()
}
fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_model() -> String {
    "openai/gpt-4o-mini".into()
}
fn default_max_tokens() -> u32 {
    150
}
fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            timeout_secs: None,
            system_prompt: default_system_prompt(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum similarity ratio for a knowledge-base answer
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.75
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// JSON-lines file every exchange is appended to
    #[serde(default = "default_history_path")]
    pub path: PathBuf,
}

fn default_history_path() -> PathBuf {
    PathBuf::from("chat_history.json")
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// A predefined question and its canned answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntryConfig {
    pub question: String,
    pub answer: String,
}

impl KnowledgeEntryConfig {
    fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// The built-in professional Q&A table.
pub fn default_knowledge() -> Vec<KnowledgeEntryConfig> {
    vec![
        KnowledgeEntryConfig::new(
            "How can I improve team productivity?",
            "Use daily stand-ups, set clear OKRs, and encourage time-blocking.",
        ),
        KnowledgeEntryConfig::new(
            "Tips for remote work?",
            "Maintain a fixed schedule, use video check-ins, and set clear boundaries.",
        ),
        KnowledgeEntryConfig::new(
            "How to prioritize tasks?",
            "Use the Eisenhower Matrix: urgent-important, not urgent-important, etc.",
        ),
        KnowledgeEntryConfig::new(
            "How to manage startup funding?",
            "Track runway, maintain investor relations, and plan funding rounds early.",
        ),
        KnowledgeEntryConfig::new(
            "How to build strong company culture?",
            "Encourage transparency, celebrate wins, and promote feedback culture.",
        ),
        KnowledgeEntryConfig::new(
            "Best practices for time management?",
            "Use Pomodoro technique, batch similar tasks, and avoid multitasking.",
        ),
        KnowledgeEntryConfig::new(
            "How to avoid burnout?",
            "Take breaks, delegate tasks, and set realistic goals.",
        ),
        KnowledgeEntryConfig::new(
            "What’s the best way to run meetings?",
            "Keep them short, set an agenda, and assign clear next steps.",
        ),
    ]
}

impl AppConfig {
    /// Load configuration from `path`, or from `./askdesk.toml` when `None`.
    ///
    /// Environment variables override the file:
    /// - `ASKDESK_API_KEY` (highest priority)
    /// - `OPENROUTER_API_KEY`
    /// - `OPENAI_API_KEY`
    /// - `ASKDESK_MODEL`, `ASKDESK_BASE_URL`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);
        let mut config = Self::load_from(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("ASKDESK_API_KEY")
            .or_else(|| non_empty("OPENROUTER_API_KEY"))
            .or_else(|| non_empty("OPENAI_API_KEY"))
        {
            self.api_key = Some(key);
        }

        if let Some(model) = non_empty("ASKDESK_MODEL") {
            self.provider.model = model;
        }

        if let Some(base_url) = non_empty("ASKDESK_BASE_URL") {
            self.provider.base_url = base_url;
        }
    }

    /// `./askdesk.toml`
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.matching.threshold) {
            return Err(ConfigError::ValidationError(
                "matching.threshold must be between 0.0 and 1.0".into(),
            ));
        }

        if self.provider.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "provider.max_tokens must be > 0".into(),
            ));
        }

        if let Some(t) = self.provider.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(
                    "provider.temperature must be between 0.0 and 2.0".into(),
                ));
            }
        }

        if let Some(i) = self.knowledge.iter().position(|e| e.question.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "knowledge entry #{} has an empty question",
                i + 1
            )));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: ProviderConfig::default(),
            matching: MatchingConfig::default(),
            history: HistoryConfig::default(),
            gateway: GatewayConfig::default(),
            knowledge: default_knowledge(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
