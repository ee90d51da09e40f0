//! Completion client factory.
//!
//! Builds the configured provider behind a shared, read-only handle that a
//! pipeline run (or many concurrent runs) can hold.

use crate::client::LlmClient;
use crate::providers::ollama::DEFAULT_OLLAMA_URL;
use crate::providers::openai::DEFAULT_OPENAI_URL;
use crate::providers::{OllamaClient, OpenAiClient};
use crate::types::ProviderType;
use helpdesk_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a completion client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "ollama")
/// * `endpoint` - Optional custom base URL
/// * `api_key` - API key (required for "openai")
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or its
/// credential is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider)
        .ok_or_else(|| AppError::Config(format!("Unknown provider: {}", provider)))?;

    match provider_type {
        ProviderType::Ollama => {
            let base_url = endpoint.unwrap_or(DEFAULT_OLLAMA_URL);
            tracing::debug!("Creating Ollama client for {}", base_url);
            Ok(Arc::new(OllamaClient::with_base_url(base_url)))
        }
        ProviderType::OpenAI => {
            let api_key = api_key
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| AppError::Config("OpenAI provider requires API key".to_string()))?;
            let base_url = endpoint.unwrap_or(DEFAULT_OPENAI_URL);
            tracing::debug!("Creating OpenAI-compatible client for {}", base_url);
            Ok(Arc::new(OpenAiClient::with_base_url(base_url, api_key)))
        }
    }
}

/// Base URL a provider uses when no endpoint is configured.
pub fn default_endpoint(provider: &str) -> Option<&'static str> {
    match ProviderType::parse(provider)? {
        ProviderType::OpenAI => Some(DEFAULT_OPENAI_URL),
        ProviderType::Ollama => Some(DEFAULT_OLLAMA_URL),
    }
}
