//! Reason/act loop entities
//!
//! Each THINK step yields a [`LoopAction`]. Tool calls and rejected actions
//! both land in the [`LoopTrace`], which is replayed to the model on the
//! next step so it can correct itself.

use crate::core::string::{extract_delimited, strip_code_fence, truncate};
use crate::tool::{ToolCall, ToolResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decision produced by one THINK step
#[derive(Debug, Clone, PartialEq)]
pub enum LoopAction {
    /// Call a tool
    Call { thought: String, call: ToolCall },
    /// Terminal answer
    Answer { thought: String, answer: String },
    /// Output that is neither a call nor an answer
    Invalid { raw: String, reason: String },
}

#[derive(Deserialize)]
struct RawAction {
    #[serde(default)]
    thought: String,
    #[serde(default, alias = "tool_name", alias = "action")]
    tool: Option<String>,
    #[serde(default, alias = "arguments", alias = "tool_args")]
    args: Option<serde_json::Value>,
    #[serde(default, alias = "final_answer")]
    answer: Option<serde_json::Value>,
}

/// Parse a THINK response.
///
/// Expected: `{"thought": .., "tool": .., "args": {..}}` or
/// `{"thought": .., "answer": ..}`. A non-string answer is kept as JSON text.
pub fn parse_action(response: &str) -> LoopAction {
    let invalid = |reason: &str| LoopAction::Invalid {
        raw: truncate(response.trim(), 500),
        reason: reason.to_string(),
    };

    let body = strip_code_fence(response);
    let Some(object) = extract_delimited(body, '{', '}') else {
        return invalid("response is not a JSON object");
    };
    let raw: RawAction = match serde_json::from_str(object) {
        Ok(raw) => raw,
        Err(e) => return invalid(&format!("malformed JSON: {}", e)),
    };

    if let Some(answer) = raw.answer.filter(|a| !a.is_null()) {
        let answer = match answer {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        return LoopAction::Answer {
            thought: raw.thought,
            answer,
        };
    }

    let Some(tool) = raw.tool.filter(|t| !t.trim().is_empty()) else {
        return invalid("neither a tool call nor an answer");
    };
    let arguments: HashMap<String, serde_json::Value> = match raw.args {
        None | Some(serde_json::Value::Null) => HashMap::new(),
        Some(serde_json::Value::Object(map)) => map.into_iter().collect(),
        Some(_) => return invalid("tool arguments must be a JSON object"),
    };

    LoopAction::Call {
        thought: raw.thought,
        call: ToolCall {
            tool_name: tool.trim().to_string(),
            arguments,
        },
    }
}

/// One recorded ACT step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub step: usize,
    pub thought: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<ToolCall>,
    pub result: ToolResult,
}

/// Ordered record of one loop run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoopTrace {
    entries: Vec<TraceEntry>,
}

impl LoopTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| !e.result.success).count()
    }

    /// Trace replayed to the model; each observation capped at `max_observation` bytes
    pub fn render(&self, max_observation: usize) -> String {
        self.entries
            .iter()
            .map(|e| {
                let action = match &e.call {
                    Some(call) => format!(
                        "{}({})",
                        call.tool_name,
                        serde_json::to_string(&call.arguments).unwrap_or_default()
                    ),
                    None => "(invalid action)".to_string(),
                };
                format!(
                    "Step {}\nThought: {}\nAction: {}\nObservation: {}",
                    e.step,
                    e.thought,
                    action,
                    truncate(&e.result.observation(), max_observation)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// One-line outcome per step, e.g. `1. search_ncbi ok`
    pub fn summary(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| {
                let outcome = match e.result.error() {
                    None => "ok".to_string(),
                    Some(err) => err.code.clone(),
                };
                format!("{}. {} {}", e.step, e.result.tool_name, outcome)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolError;
    use serde_json::json;

    #[test]
    fn test_parse_tool_call() {
        let action = parse_action(
            r#"{"thought": "look it up", "tool": "search_ncbi", "args": {"database": "gene", "term": "Shh"}}"#,
        );
        let LoopAction::Call { thought, call } = action else {
            panic!("expected call");
        };
        assert_eq!(thought, "look it up");
        assert_eq!(call.tool_name, "search_ncbi");
        assert_eq!(call.arguments.get("term"), Some(&json!("Shh")));
    }

    #[test]
    fn test_parse_answer_in_fence() {
        let action = parse_action("```json\n{\"thought\": \"done\", \"answer\": \"TP53\"}\n```");
        assert_eq!(
            action,
            LoopAction::Answer {
                thought: "done".into(),
                answer: "TP53".into()
            }
        );
    }

    #[test]
    fn test_parse_structured_answer() {
        let action = parse_action(r#"{"answer": {"genes": ["a"]}}"#);
        let LoopAction::Answer { answer, .. } = action else {
            panic!("expected answer");
        };
        assert_eq!(answer, r#"{"genes":["a"]}"#);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse_action("I think I should search."), LoopAction::Invalid { .. }));
        assert!(matches!(parse_action("{\"thought\": \"hmm\"}"), LoopAction::Invalid { .. }));
        assert!(matches!(parse_action("{not json}"), LoopAction::Invalid { .. }));
        let LoopAction::Invalid { reason, .. } =
            parse_action(r#"{"tool": "search_ncbi", "args": "gene Shh"}"#)
        else {
            panic!("expected invalid");
        };
        assert!(reason.contains("JSON object"));
    }

    #[test]
    fn test_trace_render_and_summary() {
        let mut trace = LoopTrace::new();
        trace.push(TraceEntry {
            step: 1,
            thought: "search".into(),
            call: Some(ToolCall::new("search_ncbi").with_arg("term", "Shh")),
            result: ToolResult::success("search_ncbi", "ids: 20423"),
        });
        trace.push(TraceEntry {
            step: 2,
            thought: String::new(),
            call: None,
            result: ToolResult::failure("(none)", ToolError::invalid_call("not JSON")),
        });

        assert_eq!(trace.failures(), 1);
        let text = trace.render(100);
        assert!(text.contains("Action: search_ncbi({\"term\":\"Shh\"})"));
        assert!(text.contains("Observation: Error: [INVALID_CALL] not JSON"));
        assert_eq!(trace.summary(), vec!["1. search_ncbi ok", "2. (none) INVALID_CALL"]);
    }
}
