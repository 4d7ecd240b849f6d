//! Typed input for one text-completion call

use serde::{Deserialize, Serialize};

/// Output shape the caller expects back
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "options")]
pub enum ResponseFormat {
    #[default]
    Text,
    /// A JSON document; gateways that support it request JSON mode
    Json,
    /// Exactly one of a fixed set of words
    Choice(Vec<String>),
}

/// A system/user prompt pair plus output constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Call-site name used in logs, e.g. "planner" or "translate_query"
    pub purpose: String,
    pub system: String,
    pub user: String,
    #[serde(default)]
    pub format: ResponseFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(
        purpose: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            purpose: purpose.into(),
            system: system.into(),
            user: user.into(),
            format: ResponseFormat::Text,
            max_tokens: None,
        }
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn choice(mut self, options: &[&str]) -> Self {
        self.format = ResponseFormat::Choice(options.iter().map(|s| s.to_string()).collect());
        self
    }
}
