//! Completion client abstraction and request/response types.
//!
//! This module defines the core abstractions for talking to a completion
//! service, plus [`complete_structured`] for schema-constrained output.

use helpdesk_core::{AppError, AppResult};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// JSON schema the completion must conform to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSchema {
    /// Schema name reported to the provider
    pub name: String,

    /// JSON schema document
    pub schema: serde_json::Value,
}

impl ResponseSchema {
    /// Derive the response schema for a type.
    pub fn of<T: JsonSchema>() -> AppResult<Self> {
        let schema = schemars::schema_for!(T);
        let mut value = serde_json::to_value(&schema)?;

        if let Some(object) = value.as_object_mut() {
            object.remove("$schema");
        }

        Ok(Self {
            name: T::schema_name().to_string(),
            schema: value,
        })
    }
}

/// Completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// The user message to send
    pub prompt: String,

    /// Model identifier (e.g., "gpt-4o-mini", "llama3.2")
    pub model: String,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// System instruction (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Structured-output schema; free text when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<ResponseSchema>,
}

impl LlmRequest {
    /// Create a new request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_tokens: None,
            temperature: None,
            system: None,
            response_schema: None,
        }
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Require the completion to conform to a JSON schema.
    pub fn with_response_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    pub usage: LlmUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens used
    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Trait for completion providers.
///
/// Implementations must honor `LlmRequest::response_schema` by asking the
/// service for schema-conforming JSON.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "openai", "ollama").
    fn provider_name(&self) -> &str;

    /// Perform a non-streaming completion.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}

/// Request a completion conforming to `T`'s JSON schema and parse it.
///
/// A response that does not parse as `T` is reported as an `AppError::Llm`.
pub async fn complete_structured<T>(client: &dyn LlmClient, request: LlmRequest) -> AppResult<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let request = request.with_response_schema(ResponseSchema::of::<T>()?);
    let response = client.complete(&request).await?;

    tracing::debug!(
        "Structured completion from {} ({} tokens)",
        client.provider_name(),
        response.usage.total_tokens
    );

    parse_structured(&response.content)
}

/// Parse structured completion text, tolerating a surrounding code fence.
pub fn parse_structured<T: DeserializeOwned>(content: &str) -> AppResult<T> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body)
        .map_err(|e| AppError::Llm(format!("Malformed structured response: {}", e)))
}
