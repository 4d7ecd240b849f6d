//! Per-step findings and satisfaction chaining

use serde::{Deserialize, Serialize};

/// How a finding was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Retrieval returned evidence and it was analysed
    Evidence,
    /// Retrieval returned nothing
    NoEvidence,
    /// A completion failure or an unfinished expert loop cut the step short
    Degraded,
}

/// Finding text recorded when retrieval produced no evidence
pub const NO_EVIDENCE: &str = "No evidence found";

/// What the researcher and expert produced for one plan step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub step: String,
    pub research: String,
    pub kind: FindingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expert: Option<String>,
}

impl Finding {
    pub fn evidence(step: impl Into<String>, research: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            research: research.into(),
            kind: FindingKind::Evidence,
            expert: None,
        }
    }

    pub fn no_evidence(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            research: NO_EVIDENCE.to_string(),
            kind: FindingKind::NoEvidence,
            expert: None,
        }
    }

    pub fn degraded(step: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self {
            step: step.into(),
            research: format!("Research failed: {}", reason),
            kind: FindingKind::Degraded,
            expert: None,
        }
    }

    pub fn with_expert(mut self, answer: impl Into<String>) -> Self {
        self.expert = Some(answer.into());
        self
    }

    /// Record an expert run that ended without an answer. The finding is
    /// degraded whatever its research produced.
    pub fn with_expert_failure(mut self, note: impl Into<String>) -> Self {
        self.expert = Some(note.into());
        self.kind = FindingKind::Degraded;
        self
    }

    pub fn is_degraded(&self) -> bool {
        self.kind == FindingKind::Degraded
    }

    /// Research and expert answer combined, as judged and synthesized
    pub fn answer(&self) -> String {
        match &self.expert {
            Some(expert) => format!("{}\n\nExpert: {}", self.research, expert),
            None => self.research.clone(),
        }
    }
}

/// Read a yes/no judgement. Anything but a leading "yes" is no.
pub fn parse_yes_no(response: &str) -> bool {
    response
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_ascii_lowercase()
        .starts_with("yes")
}

/// Length of the satisfied prefix.
///
/// Steps depend on their predecessors, so the first unsatisfactory verdict
/// ends the chain and everything after it is dropped.
pub fn satisfied_prefix_len(verdicts: impl IntoIterator<Item = bool>) -> usize {
    verdicts.into_iter().take_while(|ok| *ok).count()
}

/// Findings usable for synthesis given per-finding verdicts
pub fn chain_satisfied<'a>(findings: &'a [Finding], verdicts: &[bool]) -> &'a [Finding] {
    let len = satisfied_prefix_len(verdicts.iter().copied()).min(findings.len());
    &findings[..len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_truncates_at_first_failure() {
        let findings = vec![
            Finding::evidence("find trait X", "resolved"),
            Finding::evidence("find marker Y", "unsatisfactory"),
            Finding::evidence("link them", "resolved"),
        ];
        let used = chain_satisfied(&findings, &[true, false, true]);
        assert_eq!(used.len(), 1);
        assert_eq!(used[0].step, "find trait X");
    }

    #[test]
    fn test_chain_all_ok_and_first_fail() {
        let findings = vec![Finding::evidence("a", "x"), Finding::evidence("b", "y")];
        assert_eq!(chain_satisfied(&findings, &[true, true]).len(), 2);
        assert!(chain_satisfied(&findings, &[false, true]).is_empty());
        // missing verdicts count as unjudged and stop the chain
        assert_eq!(chain_satisfied(&findings, &[true]).len(), 1);
    }

    #[test]
    fn test_parse_yes_no() {
        assert!(parse_yes_no("yes"));
        assert!(parse_yes_no("Yes."));
        assert!(parse_yes_no("\"yes\""));
        assert!(!parse_yes_no("no"));
        assert!(!parse_yes_no("maybe, yes"));
        assert!(!parse_yes_no(""));
    }

    #[test]
    fn test_finding_answer() {
        let finding = Finding::no_evidence("step").with_expert("Gene 7157 is TP53");
        assert_eq!(finding.kind, FindingKind::NoEvidence);
        assert_eq!(finding.answer(), "No evidence found\n\nExpert: Gene 7157 is TP53");
    }

    #[test]
    fn test_expert_failure_degrades_the_finding() {
        let finding = Finding::evidence("find Shh", "Shh is on chr5")
            .with_expert_failure("Unfinished: no answer within 2 tool steps");

        assert!(finding.is_degraded());
        assert_eq!(finding.research, "Shh is on chr5");
        assert!(finding.answer().ends_with("Expert: Unfinished: no answer within 2 tool steps"));
    }
}
