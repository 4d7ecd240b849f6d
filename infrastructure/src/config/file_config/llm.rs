//! Model endpoint configuration (`[llm]` and `[embedding]` sections)

use serde::{Deserialize, Serialize};

/// Chat-completion endpoint
///
/// # Example
///
/// ```toml
/// [llm]
/// endpoint = "https://api.openai.com/v1"
/// model = "gpt-4o-mini"
/// temperature = 0.0
/// timeout_seconds = 120
/// ```
///
/// `api_key` is usually supplied through `GNSEARCH_LLM__API_KEY` rather than
/// written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    /// Upper bound on generated tokens when a call sets none
    pub max_tokens: Option<u32>,
    pub timeout_seconds: u64,
    /// Extra attempts for a failed completion
    pub retries: usize,
    /// Base delay between attempts, grows linearly
    pub retry_backoff_ms: u64,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.0,
            max_tokens: None,
            timeout_seconds: 120,
            retries: 2,
            retry_backoff_ms: 500,
        }
    }
}

/// Embedding endpoint used to build the semantic index
///
/// ```toml
/// [embedding]
/// model = "text-embedding-3-small"
/// batch_size = 64
/// ```
///
/// Unset `endpoint` and `api_key` fall back to the `[llm]` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEmbeddingConfig {
    pub endpoint: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    /// Documents sent per embedding request
    pub batch_size: usize,
}

impl Default for FileEmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: "text-embedding-3-small".to_string(),
            api_key: None,
            batch_size: 64,
        }
    }
}
