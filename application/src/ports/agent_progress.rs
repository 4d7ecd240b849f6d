//! Agent execution progress port.
//!
//! [`AgentProgressNotifier`] is an output port the presentation layer
//! implements to show a running query. All methods default to no-ops, so an
//! implementation only overrides what it displays.
//!
//! Callbacks may arrive from concurrently running plan steps.

use gnsearch_domain::{AnswerStatus, Finding, Plan, SupervisorState};

pub trait AgentProgressNotifier: Send + Sync {
    /// Called when the supervisor enters a new state
    fn on_state_change(&self, _from: SupervisorState, _to: SupervisorState) {}

    /// Called once the plan is known
    fn on_plan(&self, _plan: &Plan) {}

    /// Called when work on a plan step (or follow-up) starts
    fn on_step_start(&self, _description: &str) {}

    /// Called when a step's research yields a finding
    fn on_finding(&self, _finding: &Finding) {}

    /// Called when the expert invokes a tool
    fn on_tool_call(&self, _tool_name: &str, _args: &str) {}

    /// Called when a tool returns
    fn on_tool_result(&self, _tool_name: &str, _success: bool) {}

    /// Called before a completion call is retried
    fn on_retry(&self, _purpose: &str, _attempt: usize, _error: &str) {}

    /// Called when the final answer is ready
    fn on_complete(&self, _status: AnswerStatus) {}
}

/// No-op progress notifier
pub struct NoAgentProgress;

impl AgentProgressNotifier for NoAgentProgress {}
