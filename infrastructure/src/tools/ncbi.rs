//! NCBI E-utilities tools: `search_ncbi`, `fetch_record`, `summarize_record`

use crate::config::FileToolsConfig;
use async_trait::async_trait;
use gnsearch_domain::{
    ParamType, ProviderError, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolProvider,
    ToolResult,
};
use std::time::{Duration, Instant};
use tracing::debug;

pub const SEARCH_NCBI: &str = "search_ncbi";
pub const FETCH_RECORD: &str = "fetch_record";
pub const SUMMARIZE_RECORD: &str = "summarize_record";

/// Identifies this client to NCBI alongside the contact email
const TOOL_ID: &str = "gnsearch";

pub fn search_ncbi_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEARCH_NCBI,
        "Search an NCBI database (e.g., nucleotide, protein, pubmed) for a term",
    )
    .with_parameter(ToolParameter::new(
        "database",
        "Database name like 'nucleotide' or 'pubmed'",
        true,
    ))
    .with_parameter(ToolParameter::new("term", "Search term or query", true))
    .with_parameter(
        ToolParameter::new("max_results", "Max results (default 10)", false)
            .with_type(ParamType::Integer)
            .with_default(10),
    )
}

pub fn fetch_record_definition() -> ToolDefinition {
    ToolDefinition::new(
        FETCH_RECORD,
        "Fetch a record from an NCBI database (e.g., nucleotide, protein, pubmed)",
    )
    .with_parameter(ToolParameter::new(
        "database",
        "Database name like 'nucleotide' or 'pubmed'",
        true,
    ))
    .with_parameter(ToolParameter::new("record_id", "Identifier of record", true))
    .with_parameter(ToolParameter::new(
        "rettype",
        "Return type compatible with database",
        true,
    ))
}

pub fn summarize_record_definition() -> ToolDefinition {
    ToolDefinition::new(
        SUMMARIZE_RECORD,
        "Get summary on a record from an NCBI database (e.g., nucleotide, protein, pubmed)",
    )
    .with_parameter(ToolParameter::new(
        "database",
        "Database name like 'nucleotide' or 'pubmed'",
        true,
    ))
    .with_parameter(ToolParameter::new("record_id", "Identifier of record", true))
}

/// Tool provider backed by the NCBI E-utilities HTTP API
#[derive(Debug, Clone)]
pub struct NcbiToolProvider {
    http: reqwest::Client,
    base_url: String,
    email: Option<String>,
    api_key: Option<String>,
}

impl NcbiToolProvider {
    pub fn new(config: &FileToolsConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.ncbi_base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_key: config.ncbi_api_key.clone(),
        })
    }

    /// GET one E-utility with the shared identification parameters
    async fn get(&self, utility: &str, params: &[(&str, String)]) -> Result<String, ToolError> {
        let url = format!("{}/{}.fcgi", self.base_url, utility);
        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("tool", TOOL_ID.to_string()));
        if let Some(email) = &self.email {
            query.push(("email", email.clone()));
        }
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.clone()));
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(format!("NCBI {} failed: {}", utility, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::execution_failed(format!(
                "NCBI {} returned HTTP {}",
                utility,
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ToolError::execution_failed(format!("NCBI {} body: {}", utility, e)))
    }

    async fn search(&self, call: &ToolCall) -> Result<String, ToolError> {
        let database = call.require_string("database").map_err(ToolError::invalid_call)?;
        let term = call.require_string("term").map_err(ToolError::invalid_call)?;
        let max_results = call.get_i64("max_results").unwrap_or(10).max(0);

        let body = self
            .get(
                "esearch",
                &[
                    ("db", database),
                    ("term", term),
                    ("retmax", max_results.to_string()),
                    ("retmode", "json".to_string()),
                ],
            )
            .await?;

        let value = parse_json("esearch", &body)?;
        let result = value
            .get("esearchresult")
            .ok_or_else(|| ToolError::execution_failed("esearch response has no result"))?;
        if let Some(error) = result.get("ERROR").and_then(|e| e.as_str()) {
            return Err(ToolError::execution_failed(format!("esearch: {}", error)));
        }
        Ok(result.to_string())
    }

    async fn fetch(&self, call: &ToolCall) -> Result<String, ToolError> {
        let database = call.require_string("database").map_err(ToolError::invalid_call)?;
        let record_id = call.require_string("record_id").map_err(ToolError::invalid_call)?;
        let rettype = call.require_string("rettype").map_err(ToolError::invalid_call)?;

        let body = self
            .get(
                "efetch",
                &[
                    ("db", database),
                    ("id", record_id),
                    ("rettype", rettype),
                    ("retmode", "text".to_string()),
                ],
            )
            .await?;

        Ok(first_line(&body).to_string())
    }

    async fn summarize(&self, call: &ToolCall) -> Result<String, ToolError> {
        let database = call.require_string("database").map_err(ToolError::invalid_call)?;
        let record_id = call.require_string("record_id").map_err(ToolError::invalid_call)?;

        let body = self
            .get(
                "esummary",
                &[
                    ("db", database),
                    ("id", record_id),
                    ("retmode", "json".to_string()),
                ],
            )
            .await?;

        let value = parse_json("esummary", &body)?;
        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            return Err(ToolError::execution_failed(format!("esummary: {}", error)));
        }
        Ok(value.get("result").unwrap_or(&value).to_string())
    }
}

fn parse_json(utility: &str, body: &str) -> Result<serde_json::Value, ToolError> {
    serde_json::from_str(body).map_err(|e| {
        ToolError::execution_failed(format!("NCBI {} returned invalid JSON", utility))
            .with_details(e.to_string())
    })
}

/// First non-empty line, trimmed
fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("")
}

#[async_trait]
impl ToolProvider for NcbiToolProvider {
    fn id(&self) -> &str {
        "ncbi"
    }

    fn display_name(&self) -> &str {
        "NCBI E-utilities"
    }

    async fn is_available(&self) -> bool {
        !self.base_url.is_empty()
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
        Ok(vec![
            search_ncbi_definition(),
            fetch_record_definition(),
            summarize_record_definition(),
        ])
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        let outcome = match call.tool_name.as_str() {
            SEARCH_NCBI => self.search(call).await,
            FETCH_RECORD => self.fetch(call).await,
            SUMMARIZE_RECORD => self.summarize(call).await,
            other => Err(ToolError::not_found(other)),
        };
        let elapsed = start.elapsed().as_millis() as u64;
        debug!(tool = %call.tool_name, elapsed_ms = elapsed, ok = outcome.is_ok(), "NCBI call");

        let result = match outcome {
            Ok(output) => ToolResult::success(&call.tool_name, output),
            Err(error) => ToolResult::failure(&call.tool_name, error),
        };
        result.with_duration(elapsed)
    }
}
