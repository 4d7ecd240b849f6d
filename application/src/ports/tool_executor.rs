//! Tool Executor port
//!
//! The registry of expert tools as seen by the reason/act loop.

use async_trait::async_trait;
use gnsearch_domain::tool::{ToolCall, ToolDefinition, ToolResult, ToolSpec};

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Specification of all available tools, aliases included
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool (or alias) is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().resolve(name).is_some()
    }

    /// Get the definition of a tool by name or alias
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get_resolved(name)
    }

    /// Execute a validated call.
    ///
    /// Failures are reported in the returned [`ToolResult`], never as a panic.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
