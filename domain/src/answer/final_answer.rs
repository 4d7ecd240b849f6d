use crate::agent::{AgentMessage, Finding, Plan};
use serde::{Deserialize, Serialize};

/// How the supervisor reached its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    /// Finalized normally
    Complete,
    /// A step's research or expert run failed, or synthesis failed and the
    /// answer is assembled from raw findings
    Degraded,
    /// The global step cap forced finalization
    StepCapReached,
}

impl AnswerStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AnswerStatus::Complete => "complete",
            AnswerStatus::Degraded => "degraded",
            AnswerStatus::StepCapReached => "step_cap_reached",
        }
    }
}

impl std::fmt::Display for AnswerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one supervised query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalAnswer {
    pub query: String,
    pub answer: String,
    pub status: AnswerStatus,
    /// The satisfied prefix of findings the answer was synthesized from
    pub findings_used: Vec<Finding>,
    pub plan: Plan,
    pub history: Vec<AgentMessage>,
    /// One line per expert tool step, across all loop runs
    pub trace_summary: Vec<String>,
}

impl FinalAnswer {
    /// Fallback text when synthesis is unavailable
    pub fn fallback_text(findings: &[Finding]) -> String {
        if findings.is_empty() {
            return "No satisfactory findings were produced for this query.".to_string();
        }
        findings
            .iter()
            .map(|f| format!("{}: {}", f.step, f.answer()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&AnswerStatus::StepCapReached).unwrap(),
            "\"step_cap_reached\""
        );
    }

    #[test]
    fn test_fallback_text() {
        assert!(FinalAnswer::fallback_text(&[]).starts_with("No satisfactory findings"));
        let text = FinalAnswer::fallback_text(&[Finding::evidence("find X", "X is on chr1")]);
        assert_eq!(text, "find X: X is on chr1");
    }
}
