//! OpenAI-compatible HTTP adapters
//!
//! Works against any server that speaks the `/chat/completions` and
//! `/embeddings` dialect (OpenAI, vLLM, Ollama, llama.cpp server).

mod chat;
mod embeddings;
mod types;

pub use chat::OpenAiGateway;
pub use embeddings::OpenAiEmbedder;

use gnsearch_application::CompletionError;
use reqwest::StatusCode;

/// Secret that never shows up in `Debug` output
#[derive(Clone)]
pub(crate) struct ApiKey(String);

impl ApiKey {
    pub(crate) fn new(key: Option<&str>) -> Option<Self> {
        key.map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| Self(k.to_string()))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Join a base URL and an endpoint path without doubling slashes
pub(crate) fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub(crate) fn classify_transport(e: &reqwest::Error) -> CompletionError {
    if e.is_timeout() {
        CompletionError::Timeout
    } else if e.is_connect() {
        CompletionError::ConnectionError(e.to_string())
    } else {
        CompletionError::RequestFailed(e.to_string())
    }
}

pub(crate) fn classify_status(status: StatusCode, body: &str) -> CompletionError {
    let message = types::error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CompletionError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited(message),
        _ => CompletionError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), message)),
    }
}
