//! Remote completion providers for Askdesk.
//!
//! All providers implement the `askdesk_core::Provider` trait.
//! [`build_from_config`] creates the one the service is configured for.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use std::sync::Arc;
use std::time::Duration;

use askdesk_config::AppConfig;
use askdesk_core::error::ProviderError;
use askdesk_core::provider::Provider;

/// Build the configured provider.
///
/// A missing API key is not an error here: the provider is still built and
/// every completion fails with [`ProviderError::NotConfigured`].
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    if config.api_key.is_none() {
        tracing::warn!(
            provider = %config.provider.name,
            "No API key configured; fallback answers will report an error"
        );
    }

    let provider = OpenAiCompatProvider::new(
        &config.provider.name,
        &config.provider.base_url,
        config.api_key.clone(),
        config.provider.timeout_secs.map(Duration::from_secs),
    )?;

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_without_api_key() {
        let provider = build_from_config(&AppConfig::default()).unwrap();
        assert_eq!(provider.name(), "openrouter");
    }

    #[test]
    fn uses_configured_name() {
        let mut config = AppConfig::default();
        config.provider.name = "local-vllm".into();
        config.provider.base_url = "http://127.0.0.1:8000/v1".into();
        config.api_key = Some("token".into());
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "local-vllm");
    }
}
