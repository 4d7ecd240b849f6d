//! Tool provider abstraction
//!
//! A [`ToolProvider`] is an external source of tools plugged into the
//! registry. The expert agent sees the union of all providers' tools.
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │               ToolRegistry                │
//! │  (aggregates providers, routes by name)   │
//! └───────────────────────────────────────────┘
//!          │                        │
//!          ▼                        ▼
//!   ┌──────────────┐        ┌──────────────┐
//!   │ NCBI         │        │ SPARQL       │
//!   │ E-utilities  │        │ fetch_data   │
//!   └──────────────┘        └──────────────┘
//! ```
//!
//! When two providers declare the same tool name, the one with the higher
//! [`priority`](ToolProvider::priority) wins.

use async_trait::async_trait;
use thiserror::Error;

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolResult;

/// Error type for tool provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// External source of tools
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Unique identifier, e.g. "ncbi" or "sparql"
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    /// Priority for tool resolution (higher = preferred)
    fn priority(&self) -> i32 {
        0
    }

    /// Whether the provider is configured well enough to be used
    async fn is_available(&self) -> bool;

    /// Tools this provider can execute
    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError>;

    /// Execute a validated tool call.
    ///
    /// The call's tool name is canonical and its defaults are filled in.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::ToolError;

    struct MockProvider {
        tools: Vec<ToolDefinition>,
        available: bool,
    }

    impl MockProvider {
        fn new(available: bool) -> Self {
            Self {
                tools: Vec::new(),
                available,
            }
        }

        fn with_tool(mut self, name: &str) -> Self {
            self.tools
                .push(ToolDefinition::new(name, format!("Mock tool: {}", name)));
            self
        }
    }

    #[async_trait]
    impl ToolProvider for MockProvider {
        fn id(&self) -> &str {
            "mock"
        }

        fn display_name(&self) -> &str {
            "Mock Provider"
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
            if self.available {
                Ok(self.tools.clone())
            } else {
                Err(ProviderError::NotAvailable("mock".into()))
            }
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            if self.tools.iter().any(|t| t.name == call.tool_name) {
                ToolResult::success(&call.tool_name, "Mock output")
            } else {
                ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name))
            }
        }
    }

    #[tokio::test]
    async fn test_provider_discovery() {
        let provider = MockProvider::new(true)
            .with_tool("search_ncbi")
            .with_tool("fetch_record");

        assert_eq!(provider.priority(), 0);
        let tools = provider.discover_tools().await.unwrap();
        assert_eq!(tools.len(), 2);
    }

    #[tokio::test]
    async fn test_provider_not_available() {
        let provider = MockProvider::new(false);
        assert!(!provider.is_available().await);
        assert!(provider.discover_tools().await.is_err());
    }

    #[tokio::test]
    async fn test_provider_execute_unknown() {
        let provider = MockProvider::new(true).with_tool("fetch_data");
        let result = provider.execute(&ToolCall::new("other")).await;
        assert_eq!(result.error().unwrap().code, ToolError::NOT_FOUND);
    }
}
