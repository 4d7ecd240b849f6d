//! Raw configuration as read from TOML files and the environment.
//!
//! Every section derives `Default` and `#[serde(default)]`, so a partial
//! file only overrides the keys it names. [`FileConfig::to_search_config`]
//! validates the merged result and converts it into the application's
//! [`SearchConfig`].

mod agent;
mod data;
mod llm;
mod output;
mod tools;

pub use agent::{FileAgentConfig, FileRetrievalConfig};
pub use data::{FileCorpusConfig, FileSchemaConfig};
pub use llm::{FileEmbeddingConfig, FileLlmConfig};
pub use output::FileOutputConfig;
pub use tools::FileToolsConfig;

use gnsearch_application::{ExecutionParams, RetrievalParams, SearchConfig};
use gnsearch_domain::FusionWeight;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors found while validating a merged configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("{field}: timeout must be greater than zero")]
    InvalidTimeout { field: &'static str },

    #[error("{field}: model name must not be empty")]
    EmptyModelName { field: &'static str },

    #[error("{field}: weight must be within [0, 1], got {value}")]
    InvalidWeight { field: &'static str, value: f64 },

    #[error("{field}: must be greater than zero")]
    ZeroLimit { field: &'static str },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub llm: FileLlmConfig,
    pub embedding: FileEmbeddingConfig,
    pub corpus: FileCorpusConfig,
    pub schema: FileSchemaConfig,
    pub tools: FileToolsConfig,
    pub agent: FileAgentConfig,
    pub retrieval: FileRetrievalConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Check the values a run cannot work without.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName { field: "llm.model" });
        }
        if self.embedding.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName {
                field: "embedding.model",
            });
        }

        for (field, seconds) in [
            ("llm.timeout_seconds", self.llm.timeout_seconds),
            ("tools.timeout_seconds", self.tools.timeout_seconds),
            ("retrieval.timeout_seconds", self.retrieval.timeout_seconds),
        ] {
            if seconds == 0 {
                return Err(ConfigValidationError::InvalidTimeout { field });
            }
        }

        for (field, value) in [
            (
                "retrieval.default_lexical_weight",
                self.retrieval.default_lexical_weight,
            ),
            (
                "retrieval.keyword_lexical_weight",
                self.retrieval.keyword_lexical_weight,
            ),
        ] {
            if FusionWeight::new(value).is_err() {
                return Err(ConfigValidationError::InvalidWeight { field, value });
            }
        }

        for (field, value) in [
            ("agent.loop_budget", self.agent.loop_budget),
            ("agent.max_transitions", self.agent.max_transitions),
            ("agent.max_query_length", self.agent.max_query_length),
            ("retrieval.top_k", self.retrieval.top_k),
            ("embedding.batch_size", self.embedding.batch_size),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroLimit { field });
            }
        }

        Ok(())
    }

    /// Validate and convert into the application configuration.
    pub fn to_search_config(&self) -> Result<SearchConfig, ConfigValidationError> {
        self.validate()?;

        let execution = ExecutionParams::default()
            .with_loop_budget(self.agent.loop_budget)
            .with_max_transitions(self.agent.max_transitions)
            .with_max_follow_ups(self.agent.max_follow_ups)
            .with_completion_retries(self.llm.retries)
            .with_retry_backoff(Duration::from_millis(self.llm.retry_backoff_ms))
            .with_completion_timeout(Duration::from_secs(self.llm.timeout_seconds))
            .with_retrieval_timeout(Duration::from_secs(self.retrieval.timeout_seconds))
            .with_tool_timeout(Duration::from_secs(self.tools.timeout_seconds));

        let retrieval = RetrievalParams {
            lexical_k: self.retrieval.lexical_k,
            semantic_k: self.retrieval.semantic_k,
            top_k: self.retrieval.top_k,
            default_weights: weight(
                "retrieval.default_lexical_weight",
                self.retrieval.default_lexical_weight,
            )?,
            keyword_weights: weight(
                "retrieval.keyword_lexical_weight",
                self.retrieval.keyword_lexical_weight,
            )?,
        };

        Ok(SearchConfig::default()
            .with_execution(execution)
            .with_retrieval(retrieval)
            .with_max_query_length(self.agent.max_query_length))
    }

    /// Embedding base URL, falling back to the chat endpoint
    pub fn embedding_endpoint(&self) -> &str {
        self.embedding
            .endpoint
            .as_deref()
            .unwrap_or(&self.llm.endpoint)
    }

    pub fn embedding_api_key(&self) -> Option<&str> {
        self.embedding
            .api_key
            .as_deref()
            .or(self.llm.api_key.as_deref())
    }
}

fn weight(field: &'static str, value: f64) -> Result<FusionWeight, ConfigValidationError> {
    FusionWeight::new(value).map_err(|_| ConfigValidationError::InvalidWeight { field, value })
}
