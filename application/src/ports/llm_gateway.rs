//! LLM Gateway port
//!
//! The text-completion capability every agent depends on. A call takes a
//! typed [`CompletionRequest`] and returns the raw text; parsing belongs to
//! the call site.

use async_trait::async_trait;
use gnsearch_domain::CompletionRequest;
use thiserror::Error;

/// Errors that can occur during a completion call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Timeout")]
    Timeout,
}

impl CompletionError {
    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, CompletionError::Unauthorized(_))
    }
}

/// Gateway for text completion
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Run one completion and return the model's text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;

    /// Model identifier for logs
    fn model_name(&self) -> &str {
        "unknown"
    }
}
