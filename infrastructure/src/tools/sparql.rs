//! `fetch_data`: natural-language request → SPARQL → GeneNetwork endpoint

use crate::config::FileToolsConfig;
use async_trait::async_trait;
use gnsearch_application::{SchemaTranslator, TranslationError};
use gnsearch_domain::{
    ProviderError, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolProvider, ToolResult,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const FETCH_DATA: &str = "fetch_data";

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

pub fn fetch_data_definition() -> ToolDefinition {
    ToolDefinition::new(
        FETCH_DATA,
        "Fetch RDF data around GeneNetwork data through SPARQL. \
         Describe the data you need in plain language; it is translated to a query.",
    )
    .with_parameter(ToolParameter::new(
        "query",
        "Natural-language description of the data to fetch",
        true,
    ))
}

/// Tool provider that answers `fetch_data` against a SPARQL endpoint
pub struct SparqlToolProvider {
    http: reqwest::Client,
    endpoint: String,
    translator: Arc<SchemaTranslator>,
    cancellation: Option<CancellationToken>,
}

impl SparqlToolProvider {
    pub fn new(
        config: &FileToolsConfig,
        translator: Arc<SchemaTranslator>,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.sparql_endpoint.clone(),
            translator,
            cancellation: None,
        })
    }

    /// Stop pending translations when the token fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    async fn fetch(&self, call: &ToolCall) -> Result<String, ToolError> {
        let request = call.require_string("query").map_err(ToolError::invalid_call)?;

        let sparql = self
            .translator
            .translate(&request, &self.cancellation)
            .await
            .map_err(|e| match e {
                TranslationError::Cancelled => ToolError::execution_failed("Operation cancelled"),
                other => ToolError::translation_failed(other.to_string()),
            })?;
        info!(query = %sparql, "Running SPARQL query");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("query", sparql.as_str()), ("format", "json")])
            .header(reqwest::header::ACCEPT, SPARQL_RESULTS_JSON)
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(format!("SPARQL request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::execution_failed(format!("SPARQL body: {}", e)))?;
        if !status.is_success() {
            return Err(ToolError::execution_failed(format!(
                "SPARQL endpoint returned HTTP {}",
                status.as_u16()
            ))
            .with_details(format!("query: {}\n{}", sparql, body.trim())));
        }

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            ToolError::execution_failed("SPARQL endpoint returned invalid JSON")
                .with_details(e.to_string())
        })?;
        Ok(flatten_results(&value).to_string())
    }
}

/// SPARQL JSON results → `[{var: value}]`, or the boolean of an ASK query.
///
/// Anything else is passed through unchanged.
pub fn flatten_results(results: &serde_json::Value) -> serde_json::Value {
    if let Some(boolean) = results.get("boolean") {
        return boolean.clone();
    }

    let Some(bindings) = results
        .get("results")
        .and_then(|r| r.get("bindings"))
        .and_then(|b| b.as_array())
    else {
        return results.clone();
    };

    bindings
        .iter()
        .filter_map(|row| row.as_object())
        .map(|row| {
            row.iter()
                .map(|(var, cell)| {
                    let value = cell.get("value").cloned().unwrap_or(serde_json::Value::Null);
                    (var.clone(), value)
                })
                .collect::<serde_json::Map<_, _>>()
        })
        .map(serde_json::Value::Object)
        .collect()
}

#[async_trait]
impl ToolProvider for SparqlToolProvider {
    fn id(&self) -> &str {
        "sparql"
    }

    fn display_name(&self) -> &str {
        "GeneNetwork SPARQL"
    }

    async fn is_available(&self) -> bool {
        !self.endpoint.is_empty() && !self.translator.vocabulary().is_empty()
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
        Ok(vec![fetch_data_definition()])
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        if call.tool_name != FETCH_DATA {
            return ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name));
        }

        let start = Instant::now();
        let outcome = self.fetch(call).await;
        let elapsed = start.elapsed().as_millis() as u64;
        debug!(elapsed_ms = elapsed, ok = outcome.is_ok(), "fetch_data call");

        let result = match outcome {
            Ok(output) => ToolResult::success(FETCH_DATA, output),
            Err(error) => ToolResult::failure(FETCH_DATA, error),
        };
        result.with_duration(elapsed)
    }
}
