//! Tool Registry
//!
//! The [`ToolRegistry`] aggregates tool providers and implements
//! [`ToolExecutorPort`]. It handles tool discovery, alias registration,
//! and execution routing based on priority.
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = ToolRegistry::new()
//!     .register(NcbiToolProvider::new(&config.tools)?)
//!     .register(SparqlToolProvider::new(&config.tools, translator)?);
//!
//! registry.discover().await;
//!
//! assert!(registry.has_tool("search_ncbi"));
//! assert!(registry.has_tool("sparql")); // alias of fetch_data
//! ```
//!
//! # Priority-Based Resolution
//!
//! When multiple providers offer the same tool, the registry uses the provider
//! with the highest priority.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use gnsearch_application::ToolExecutorPort;
use gnsearch_domain::{ToolCall, ToolError, ToolProvider, ToolResult, ToolSpec};

/// Aliases every registry starts with
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("sparql", "fetch_data"),
    ("esearch", "search_ncbi"),
    ("efetch", "fetch_record"),
    ("esummary", "summarize_record"),
];

/// Tool registry that aggregates multiple providers
pub struct ToolRegistry {
    /// Registered providers
    providers: Vec<Arc<dyn ToolProvider>>,
    /// Tool name -> provider ID mapping (cached after discovery)
    tool_mapping: HashMap<String, String>,
    /// Alias -> canonical name, applied at discovery
    aliases: Vec<(String, String)>,
    /// Merged tool specification
    tool_spec: ToolSpec,
    /// Whether discovery has been run
    discovered: bool,
}

impl ToolRegistry {
    /// Create a registry with the default aliases and no providers
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            tool_mapping: HashMap::new(),
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(a, c)| (a.to_string(), c.to_string()))
                .collect(),
            tool_spec: ToolSpec::new(),
            discovered: false,
        }
    }

    /// Register a tool provider
    pub fn register<P: ToolProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self.discovered = false; // Invalidate cache
        self
    }

    /// Register a tool provider (Arc version)
    pub fn register_arc(mut self, provider: Arc<dyn ToolProvider>) -> Self {
        self.providers.push(provider);
        self.discovered = false;
        self
    }

    /// Add an alias; aliases whose target is never discovered are ignored
    pub fn with_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.push((alias.into(), canonical.into()));
        self.discovered = false;
        self
    }

    /// Discover tools from all providers
    ///
    /// This must be called before using the registry. Tools are merged with
    /// priority-based conflict resolution; a provider that fails discovery
    /// is skipped.
    pub async fn discover(&mut self) {
        // Sort providers by priority (descending)
        self.providers
            .sort_by_key(|p| std::cmp::Reverse(p.priority()));

        let mut tool_spec = ToolSpec::new();
        let mut tool_mapping = HashMap::new();

        for provider in &self.providers {
            if !provider.is_available().await {
                tracing::debug!(provider = provider.id(), "Provider not available, skipping");
                continue;
            }

            match provider.discover_tools().await {
                Ok(tools) => {
                    for tool in tools {
                        // Only add if not already registered (higher priority wins)
                        if !tool_mapping.contains_key(&tool.name) {
                            tracing::debug!(
                                tool = %tool.name,
                                provider = provider.id(),
                                "Registered tool"
                            );
                            tool_mapping.insert(tool.name.clone(), provider.id().to_string());
                            tool_spec = tool_spec.register(tool);
                        } else {
                            tracing::trace!(
                                tool = %tool.name,
                                provider = provider.id(),
                                "Tool already registered by higher priority provider"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.id(),
                        error = %e,
                        "Failed to discover tools from provider"
                    );
                }
            }
        }

        self.tool_spec = tool_spec.register_aliases(self.aliases.iter().cloned());
        self.tool_mapping = tool_mapping;
        self.discovered = true;
    }

    /// Get the provider for a specific tool (canonical name)
    fn provider_for(&self, tool_name: &str) -> Option<&Arc<dyn ToolProvider>> {
        let provider_id = self.tool_mapping.get(tool_name)?;
        self.providers.iter().find(|p| p.id() == provider_id)
    }

    /// Get a list of registered provider IDs
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Get statistics about registered tools
    pub fn stats(&self) -> RegistryStats {
        let mut tools_per_provider = HashMap::new();
        for provider_id in self.tool_mapping.values() {
            *tools_per_provider.entry(provider_id.clone()).or_insert(0) += 1;
        }

        RegistryStats {
            total_providers: self.providers.len(),
            total_tools: self.tool_mapping.len(),
            tools_per_provider,
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the registry
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_providers: usize,
    pub total_tools: usize,
    pub tools_per_provider: HashMap<String, usize>,
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        if !self.discovered {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::execution_failed("Registry not initialized. Call discover() first."),
            );
        }

        let Some(canonical) = self.tool_spec.resolve(&call.tool_name) else {
            return ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name));
        };

        match self.provider_for(canonical) {
            Some(provider) if canonical == call.tool_name => provider.execute(call).await,
            Some(provider) => {
                let routed = ToolCall {
                    tool_name: canonical.to_string(),
                    arguments: call.arguments.clone(),
                };
                provider.execute(&routed).await
            }
            None => ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name)),
        }
    }
}
