//! Error types for the helpdesk pipeline.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, input, I/O, completion service,
//! routing, datasets, prompts and serialization.

use thiserror::Error;

/// Unified error type for the helpdesk pipeline.
///
/// All fallible functions return `Result<T, AppError>`.
/// Stages never panic; failures are represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing credential, unknown provider)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Empty or unreadable question source
    #[error("Input error: {0}")]
    Input(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Completion service errors (transport, status, malformed response)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Domain tag that does not map to a known search partition
    #[error("Routing error: {0}")]
    Routing(String),

    /// Dataset partition errors
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Dataset(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
