//! Plans and plan parsing
//!
//! A [`Plan`] is produced once by the planner and never changes. The
//! supervisor keeps its own cursor and asks the plan for the next
//! [batch](Plan::batch_at): a single step, or a run of consecutive steps
//! flagged `parallel` that may be worked on concurrently.

use crate::core::string::{extract_delimited, strip_code_fence};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One unit of work in a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub description: String,
    #[serde(default)]
    pub parallel: bool,
}

impl PlanStep {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            parallel: false,
        }
    }

    pub fn parallel(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            parallel: true,
        }
    }
}

/// Ordered, read-only sequence of steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(steps: Vec<PlanStep>) -> Self {
        Self { steps }
    }

    /// Fallback plan: the query itself as the only step
    pub fn single_step(query: impl Into<String>) -> Self {
        Self::new(vec![PlanStep::new(query)])
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps to work on starting at `cursor`.
    ///
    /// A non-parallel step forms a batch of one. A parallel step extends the
    /// batch through every directly following parallel step. Empty once the
    /// cursor reaches the end.
    pub fn batch_at(&self, cursor: usize) -> Range<usize> {
        if cursor >= self.steps.len() {
            return self.steps.len()..self.steps.len();
        }
        if !self.steps[cursor].parallel {
            return cursor..cursor + 1;
        }
        let end = self.steps[cursor..]
            .iter()
            .position(|s| !s.parallel)
            .map_or(self.steps.len(), |offset| cursor + offset);
        cursor..end
    }

    /// Numbered listing for prompts
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}", i + 1, s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStep {
    Text(String),
    Object {
        #[serde(alias = "step", alias = "task")]
        description: String,
        #[serde(default)]
        parallel: bool,
    },
}

impl From<RawStep> for PlanStep {
    fn from(raw: RawStep) -> Self {
        match raw {
            RawStep::Text(description) => PlanStep::new(description),
            RawStep::Object {
                description,
                parallel,
            } => PlanStep {
                description,
                parallel,
            },
        }
    }
}

/// Parse planner output into steps.
///
/// Accepted shapes, tried in order:
/// 1. a JSON array of strings or of `{"description", "parallel"}` objects
/// 2. a JSON object with a `steps` array of either
/// 3. numbered or bulleted lines (other lines are ignored when any are present)
/// 4. every non-empty line
///
/// Blank descriptions are dropped. The result may be empty; the caller
/// decides the fallback.
pub fn parse_plan(response: &str) -> Vec<PlanStep> {
    let body = strip_code_fence(response);

    if let Some(steps) = parse_plan_json(body) {
        return clean(steps);
    }

    let lines: Vec<&str> = body.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let listed: Vec<String> = lines.iter().filter_map(|l| strip_list_marker(l)).collect();
    let steps = if listed.is_empty() {
        lines.iter().map(|l| PlanStep::new(*l)).collect()
    } else {
        listed.into_iter().map(PlanStep::new).collect()
    };
    clean(steps)
}

fn parse_plan_json(body: &str) -> Option<Vec<PlanStep>> {
    if let Some(array) = extract_delimited(body, '[', ']')
        && let Ok(raw) = serde_json::from_str::<Vec<RawStep>>(array)
    {
        return Some(raw.into_iter().map(PlanStep::from).collect());
    }

    #[derive(Deserialize)]
    struct Wrapped {
        #[serde(alias = "plan", alias = "tasks")]
        steps: Vec<RawStep>,
    }
    let object = extract_delimited(body, '{', '}')?;
    let wrapped: Wrapped = serde_json::from_str(object).ok()?;
    Some(wrapped.steps.into_iter().map(PlanStep::from).collect())
}

/// `1. foo`, `2) foo`, `- foo`, `* foo`, `Step 3: foo` → `foo`
fn strip_list_marker(line: &str) -> Option<String> {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(rest.trim().to_string());
    }

    let rest = line
        .strip_prefix("Step ")
        .or_else(|| line.strip_prefix("step "))
        .unwrap_or(line);
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let after = &rest[digits..];
    let after = after
        .strip_prefix('.')
        .or_else(|| after.strip_prefix(')'))
        .or_else(|| after.strip_prefix(':'))?;
    Some(after.trim().to_string())
}

fn clean(steps: Vec<PlanStep>) -> Vec<PlanStep> {
    steps
        .into_iter()
        .map(|s| PlanStep {
            description: s.description.trim().to_string(),
            parallel: s.parallel,
        })
        .filter(|s| !s.description.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_strings() {
        let steps = parse_plan(r#"["Find trait X", "Find marker Y", "Link them"]"#);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2], PlanStep::new("Link them"));
    }

    #[test]
    fn test_parse_json_objects_in_fence() {
        let response = "```json\n[\n  {\"description\": \"Look up BXD traits\", \"parallel\": true},\n  {\"step\": \"Look up GWAS hits\", \"parallel\": true},\n  {\"description\": \"Compare\"}\n]\n```";
        let steps = parse_plan(response);
        assert_eq!(
            steps,
            vec![
                PlanStep::parallel("Look up BXD traits"),
                PlanStep::parallel("Look up GWAS hits"),
                PlanStep::new("Compare"),
            ]
        );
    }

    #[test]
    fn test_parse_wrapped_object() {
        let steps = parse_plan(r#"{"steps": ["a", "b"]}"#);
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_parse_numbered_lines_ignores_preamble() {
        let response = "Here is the plan:\n1. Research the trait\n2) Ask the expert\nStep 3: Summarize\n- Reflect";
        let steps = parse_plan(response);
        let descriptions: Vec<&str> = steps.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["Research the trait", "Ask the expert", "Summarize", "Reflect"]
        );
    }

    #[test]
    fn test_parse_plain_lines() {
        let steps = parse_plan("first thing\n\nsecond thing\n");
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_plan("").is_empty());
        assert!(parse_plan("[]").is_empty());
        assert!(parse_plan(r#"["  ", ""]"#).is_empty());
    }

    #[test]
    fn test_batch_at() {
        let plan = Plan::new(vec![
            PlanStep::new("a"),
            PlanStep::parallel("b"),
            PlanStep::parallel("c"),
            PlanStep::new("d"),
            PlanStep::parallel("e"),
        ]);
        assert_eq!(plan.batch_at(0), 0..1);
        assert_eq!(plan.batch_at(1), 1..3);
        assert_eq!(plan.batch_at(3), 3..4);
        assert_eq!(plan.batch_at(4), 4..5);
        assert!(plan.batch_at(5).is_empty());
        assert!(plan.batch_at(9).is_empty());
    }

    #[test]
    fn test_single_step_and_render() {
        let plan = Plan::single_step("What is BXD?");
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.render(), "1. What is BXD?");
    }
}
