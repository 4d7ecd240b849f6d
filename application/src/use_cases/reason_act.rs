//! Bounded reason/act loop.
//!
//! Each iteration asks the model for one action (THINK). A tool call is
//! validated against the registry's schema and executed under the tool
//! timeout (ACT); the result, failure or not, is appended to the trace and
//! replayed on the next THINK. The loop ends on an answer or after `budget`
//! iterations, whichever comes first.
//!
//! Runs share nothing mutable: every call to [`ReasonActLoop::run`] owns
//! its own [`LoopTrace`], so independent goals can run concurrently on the
//! same loop instance.

use crate::config::SearchConfig;
use crate::ports::agent_progress::AgentProgressNotifier;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{CompletionError, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::shared::{CallError, Cancelled, cancellable, check_cancelled, complete_with_retry};
use gnsearch_domain::core::string::truncate;
use gnsearch_domain::{
    DefaultToolValidator, LoopAction, LoopTrace, PromptTemplate, ToolCall, ToolError, ToolResult,
    ToolValidator, TraceEntry, parse_action,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Tool name recorded for actions that never named a usable tool
const NO_TOOL: &str = "(none)";

/// Normal termination: the model produced an answer
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    pub answer: String,
    pub trace: LoopTrace,
}

#[derive(Error, Debug)]
pub enum LoopError {
    /// No answer within the budget. The partial trace is kept for the caller.
    #[error("No answer within {budget} steps")]
    BudgetExceeded { budget: usize, trace: LoopTrace },

    /// THINK failed after retries.
    #[error("Completion failed: {source}")]
    Completion {
        source: CompletionError,
        trace: LoopTrace,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<Cancelled> for LoopError {
    fn from(_: Cancelled) -> Self {
        LoopError::Cancelled
    }
}

impl LoopError {
    /// Trace accumulated before the loop stopped
    pub fn trace(&self) -> Option<&LoopTrace> {
        match self {
            LoopError::BudgetExceeded { trace, .. } | LoopError::Completion { trace, .. } => {
                Some(trace)
            }
            LoopError::Cancelled => None,
        }
    }
}

pub struct ReasonActLoop {
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
    config: Arc<SearchConfig>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ReasonActLoop {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        config: Arc<SearchConfig>,
    ) -> Self {
        Self {
            gateway,
            tools,
            config,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Run the loop for `goal` with at most `budget` THINK steps.
    pub async fn run(
        &self,
        goal: &str,
        budget: usize,
        progress: &dyn AgentProgressNotifier,
        token: &Option<CancellationToken>,
    ) -> Result<LoopOutcome, LoopError> {
        let params = &self.config.execution;
        let spec = self.tools.tool_spec();
        let mut trace = LoopTrace::new();

        for step in 1..=budget {
            check_cancelled(token)?;

            let request = PromptTemplate::expert_step(
                goal,
                spec,
                &trace.render(params.max_observation_chars),
            );
            let response =
                match complete_with_retry(self.gateway.as_ref(), &request, params, progress, token)
                    .await
                {
                    Ok(response) => response,
                    Err(CallError::Cancelled) => return Err(LoopError::Cancelled),
                    Err(CallError::Completion(source)) => {
                        return Err(LoopError::Completion { source, trace });
                    }
                };

            let entry = match parse_action(&response) {
                LoopAction::Answer { thought, answer } => {
                    info!(step, tool_calls = trace.len(), "Loop answered");
                    debug!(thought = %thought, "Final thought");
                    return Ok(LoopOutcome { answer, trace });
                }
                LoopAction::Invalid { raw, reason } => {
                    warn!(step, reason = %reason, "Unusable action");
                    TraceEntry {
                        step,
                        thought: String::new(),
                        call: None,
                        result: ToolResult::failure(
                            NO_TOOL,
                            ToolError::invalid_call(reason).with_details(raw),
                        ),
                    }
                }
                LoopAction::Call { thought, call } => {
                    let result = self.act(&call, progress, token).await?;
                    TraceEntry {
                        step,
                        thought,
                        call: Some(call),
                        result,
                    }
                }
            };
            trace.push(entry);
        }

        warn!(budget, "Loop budget exhausted");
        Err(LoopError::BudgetExceeded { budget, trace })
    }

    /// Validate and execute one call. Only cancellation escapes as an error.
    async fn act(
        &self,
        call: &ToolCall,
        progress: &dyn AgentProgressNotifier,
        token: &Option<CancellationToken>,
    ) -> Result<ToolResult, Cancelled> {
        let prepared = match DefaultToolValidator.prepare(call, self.tools.tool_spec()) {
            Ok(prepared) => prepared,
            Err(error) => {
                warn!(tool = %call.tool_name, error = %error, "Rejected tool call");
                return Ok(ToolResult::failure(&call.tool_name, error));
            }
        };

        let args = serde_json::to_string(&prepared.arguments).unwrap_or_default();
        progress.on_tool_call(&prepared.tool_name, &args);
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call",
            serde_json::json!({
                "tool": prepared.tool_name,
                "args": prepared.arguments,
            }),
        ));

        let started = Instant::now();
        let timeout = self.config.execution.tool_timeout;
        let execution = tokio::time::timeout(timeout, self.tools.execute(&prepared));
        let result = match cancellable(execution, token).await? {
            Ok(result) => result,
            Err(_) => ToolResult::failure(
                &prepared.tool_name,
                ToolError::timeout(format!("{} after {}s", prepared.tool_name, timeout.as_secs_f32())),
            ),
        };
        let result = result.with_duration(started.elapsed().as_millis() as u64);

        debug!(
            tool = %prepared.tool_name,
            success = result.success,
            duration_ms = result.duration_ms,
            "Tool returned"
        );
        progress.on_tool_result(&prepared.tool_name, result.success);
        self.conversation_logger.log(ConversationEvent::new(
            "tool_result",
            serde_json::json!({
                "tool": prepared.tool_name,
                "success": result.success,
                "duration_ms": result.duration_ms,
                "output": truncate(&result.observation(), 2000),
            }),
        ));
        Ok(result)
    }
}
