//! Supervisor state machine
//!
//! ```text
//! PLANNING ──▶ RESEARCHING ──▶ CONSULTING_EXPERT ──▶ REFLECTING
//!                   ▲                  ▲                 │
//!                   └──────────────────┴──── route ──────┤
//!                                                        ▼
//!                                   DONE ◀────────── FINALIZING
//! ```
//!
//! Any non-terminal state may also jump to FINALIZING when the global step
//! cap fires. No state may follow itself.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisorState {
    Planning,
    Researching,
    ConsultingExpert,
    Reflecting,
    Finalizing,
    Done,
}

impl SupervisorState {
    pub fn as_str(&self) -> &str {
        match self {
            SupervisorState::Planning => "planning",
            SupervisorState::Researching => "researching",
            SupervisorState::ConsultingExpert => "consulting_expert",
            SupervisorState::Reflecting => "reflecting",
            SupervisorState::Finalizing => "finalizing",
            SupervisorState::Done => "done",
        }
    }

    /// Worker name used in routing prompts
    pub fn route_name(&self) -> &str {
        match self {
            SupervisorState::Planning => "planner",
            SupervisorState::Researching => "researcher",
            SupervisorState::ConsultingExpert => "expert",
            SupervisorState::Reflecting => "reflector",
            SupervisorState::Finalizing => "end",
            SupervisorState::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SupervisorState::Done)
    }

    /// Whether the edge `self -> next` exists in the state machine
    pub fn can_transition_to(&self, next: SupervisorState) -> bool {
        use SupervisorState::*;
        match (self, next) {
            (a, b) if *a == b => false,
            (Done, _) => false,
            (Finalizing, Done) => true,
            (Finalizing, _) => false,
            (_, Finalizing) => true,
            (Planning, Researching) => true,
            (Researching, ConsultingExpert) => true,
            (ConsultingExpert, Reflecting) => true,
            (Reflecting, Researching | ConsultingExpert) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current state plus the path taken to reach it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMachine {
    current: SupervisorState,
    path: Vec<SupervisorState>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            current: SupervisorState::Planning,
            path: vec![SupervisorState::Planning],
        }
    }

    pub fn current(&self) -> SupervisorState {
        self.current
    }

    /// Every state entered so far, starting with PLANNING
    pub fn path(&self) -> &[SupervisorState] {
        &self.path
    }

    /// Number of transitions taken
    pub fn transitions(&self) -> usize {
        self.path.len() - 1
    }

    /// The last worker state entered before the current one, skipping REFLECTING
    pub fn last_worker(&self) -> Option<SupervisorState> {
        self.path
            .iter()
            .rev()
            .skip(1)
            .copied()
            .find(|s| matches!(s, SupervisorState::Researching | SupervisorState::ConsultingExpert))
    }

    pub fn transition(&mut self, next: SupervisorState) -> Result<(), DomainError> {
        if !self.current.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.current.to_string(),
                to: next.to_string(),
            });
        }
        self.current = next;
        self.path.push(next);
        Ok(())
    }
}

/// Read the routing decision out of a model response.
///
/// Accepts a bare worker name or a JSON object with a `next` field. The
/// first recognised worker word wins. Returns `None` when nothing matches.
pub fn parse_route(response: &str) -> Option<SupervisorState> {
    let text = match serde_json::from_str::<serde_json::Value>(response.trim()) {
        Ok(serde_json::Value::Object(map)) => map
            .get("next")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_lowercase(),
        _ => response.to_lowercase(),
    };

    text.split(|c: char| !c.is_ascii_alphabetic() && c != '_')
        .find_map(|word| match word {
            "researcher" | "research" | "researching" => Some(SupervisorState::Researching),
            "expert" | "consulting_expert" => Some(SupervisorState::ConsultingExpert),
            "reflector" | "critic" | "reflecting" => Some(SupervisorState::Reflecting),
            "end" | "finish" | "finalize" | "finalizing" => Some(SupervisorState::Finalizing),
            _ => None,
        })
}
