//! Scripted test doubles shared by the use case tests

use crate::ports::llm_gateway::{CompletionError, LlmGateway};
use crate::ports::retriever::{RetrievalError, Retriever};
use crate::ports::tool_executor::ToolExecutorPort;
use async_trait::async_trait;
use gnsearch_domain::tool::{ParamType, ToolCall, ToolDefinition, ToolParameter, ToolResult, ToolSpec};
use gnsearch_domain::{CompletionRequest, RankedList, RetrievalSource, RetrievedItem, ToolError};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Gateway answering from per-purpose queues of scripted responses.
///
/// When a purpose's queue is empty the sticky default for that purpose is
/// used; with no default the call fails.
#[derive(Default)]
pub struct ScriptedGateway {
    queues: Mutex<HashMap<String, VecDeque<Result<String, CompletionError>>>>,
    defaults: HashMap<String, String>,
    calls: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, purpose: &str, text: impl Into<String>) -> Self {
        self.push(purpose, Ok(text.into()))
    }

    pub fn fail(self, purpose: &str, error: CompletionError) -> Self {
        self.push(purpose, Err(error))
    }

    /// Response used whenever the purpose's queue is empty
    pub fn always(mut self, purpose: &str, text: impl Into<String>) -> Self {
        self.defaults.insert(purpose.to_string(), text.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn push(self, purpose: &str, response: Result<String, CompletionError>) -> Self {
        self.queues
            .lock()
            .unwrap()
            .entry(purpose.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self, purpose: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.purpose == purpose)
            .count()
    }

    pub fn requests(&self, purpose: &str) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.purpose == purpose)
            .cloned()
            .collect()
    }

    pub fn purposes(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.purpose.clone())
            .collect()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self
            .queues
            .lock()
            .unwrap()
            .get_mut(&request.purpose)
            .and_then(|queue| queue.pop_front());
        match scripted {
            Some(response) => response,
            None => self.defaults.get(&request.purpose).cloned().ok_or_else(|| {
                CompletionError::RequestFailed(format!("no scripted response for {}", request.purpose))
            }),
        }
    }
}

/// Retriever returning a fixed list (or error) and recording its queries
pub struct MockRetriever {
    source: RetrievalSource,
    result: Result<Vec<(String, f64, String)>, RetrievalError>,
    delay: Option<Duration>,
    queries: Mutex<Vec<String>>,
}

impl MockRetriever {
    pub fn new(source: RetrievalSource, hits: &[(&str, f64, &str)]) -> Self {
        Self {
            source,
            result: Ok(hits
                .iter()
                .map(|(id, score, text)| (id.to_string(), *score, text.to_string()))
                .collect()),
            delay: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn empty(source: RetrievalSource) -> Self {
        Self::new(source, &[])
    }

    pub fn failing(source: RetrievalSource, error: RetrievalError) -> Self {
        Self {
            source,
            result: Err(error),
            delay: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    fn source(&self) -> RetrievalSource {
        self.source
    }

    async fn search(&self, query: &str, k: usize) -> Result<RankedList, RetrievalError> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let hits = self.result.clone()?;
        Ok(RankedList::new(
            hits.into_iter()
                .take(k)
                .map(|(id, score, text)| RetrievedItem::new(id, score, self.source, text))
                .collect(),
        ))
    }
}

/// Tool executor with canned outputs keyed by tool name
pub struct MockTools {
    spec: ToolSpec,
    outputs: HashMap<String, Result<String, ToolError>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<ToolCall>>,
}

impl MockTools {
    /// NCBI search plus SPARQL lookup, the shapes the expert normally sees
    pub fn new() -> Self {
        let spec = ToolSpec::new()
            .register(
                ToolDefinition::new("search_ncbi", "Search an NCBI database")
                    .with_parameter(ToolParameter::new("database", "Database", true))
                    .with_parameter(ToolParameter::new("term", "Search term", true))
                    .with_parameter(
                        ToolParameter::new("max_results", "Limit", false)
                            .with_type(ParamType::Integer)
                            .with_default(10),
                    ),
            )
            .register(
                ToolDefinition::new("fetch_data", "Query GeneNetwork RDF data")
                    .with_parameter(ToolParameter::new("query", "Request", true)),
            )
            .register_alias("sparql", "fetch_data");
        Self {
            spec,
            outputs: HashMap::new(),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn output(mut self, tool: &str, output: &str) -> Self {
        self.outputs.insert(tool.to_string(), Ok(output.to_string()));
        self
    }

    pub fn error(mut self, tool: &str, error: ToolError) -> Self {
        self.outputs.insert(tool.to_string(), Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolExecutorPort for MockTools {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        self.calls.lock().unwrap().push(call.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.outputs.get(&call.tool_name) {
            Some(Ok(output)) => ToolResult::success(&call.tool_name, output.clone()),
            Some(Err(error)) => ToolResult::failure(&call.tool_name, error.clone()),
            None => ToolResult::success(&call.tool_name, "ok"),
        }
    }
}
