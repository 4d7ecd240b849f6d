//! Execution parameters: loop and call control.
//!
//! [`ExecutionParams`] groups the static parameters that bound the
//! supervisor, the reason/act loop and every external call. These are
//! application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Budgets, retries and timeouts.
///
/// Every completion, retrieval and tool call runs under one of the timeouts
/// below; an expired timeout is a recorded failure, never a hang.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// THINK/ACT cycles allowed per reason/act loop run.
    pub loop_budget: usize,
    /// Global cap on supervisor state transitions.
    pub max_transitions: usize,
    /// Follow-up rounds allowed after the plan is exhausted.
    pub max_follow_ups: usize,
    /// Extra attempts for a failed completion call.
    pub completion_retries: usize,
    /// Base delay between completion attempts; grows linearly.
    pub retry_backoff: Duration,
    pub completion_timeout: Duration,
    pub retrieval_timeout: Duration,
    pub tool_timeout: Duration,
    /// Observation length replayed to the model per trace step.
    pub max_observation_chars: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            loop_budget: 20,
            max_transitions: 40,
            max_follow_ups: 1,
            completion_retries: 2,
            retry_backoff: Duration::from_millis(500),
            completion_timeout: Duration::from_secs(120),
            retrieval_timeout: Duration::from_secs(30),
            tool_timeout: Duration::from_secs(60),
            max_observation_chars: 4000,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_loop_budget(mut self, budget: usize) -> Self {
        self.loop_budget = budget;
        self
    }

    pub fn with_max_transitions(mut self, max: usize) -> Self {
        self.max_transitions = max;
        self
    }

    pub fn with_max_follow_ups(mut self, max: usize) -> Self {
        self.max_follow_ups = max;
        self
    }

    pub fn with_completion_retries(mut self, retries: usize) -> Self {
        self.completion_retries = retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn with_retrieval_timeout(mut self, timeout: Duration) -> Self {
        self.retrieval_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.loop_budget, 20);
        assert_eq!(params.max_transitions, 40);
        assert_eq!(params.max_follow_ups, 1);
        assert_eq!(params.completion_retries, 2);
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_loop_budget(5)
            .with_tool_timeout(Duration::from_secs(3))
            .with_completion_retries(0);

        assert_eq!(params.loop_budget, 5);
        assert_eq!(params.tool_timeout, Duration::from_secs(3));
        assert_eq!(params.completion_retries, 0);
    }
}
