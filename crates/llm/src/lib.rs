//! Completion-service integration for the helpdesk pipeline.
//!
//! This crate provides a provider-agnostic abstraction for chat-style
//! completions, with optional JSON-schema constrained output.
//!
//! # Providers
//! - **OpenAI**: any OpenAI-compatible `/chat/completions` endpoint (default)
//! - **Ollama**: Local LLM runtime
//!
//! # Example
//! ```no_run
//! use helpdesk_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{complete_structured, LlmClient, LlmRequest, LlmResponse, LlmUsage, ResponseSchema};
pub use factory::{create_client, default_endpoint};
pub use providers::{OllamaClient, OpenAiClient};
pub use types::ProviderType;
