//! Agent domain module
//!
//! Entities shared by the planner, researcher, expert, critic and finalizer:
//! the conversation history, the plan, per-step findings, the supervisor
//! state machine and the reason/act loop trace. Parsing of every model
//! response these agents depend on also lives here, so it stays pure and
//! testable.

pub mod entities;
pub mod finding;
pub mod plan;
pub mod reasoning;
pub mod state;

pub use entities::{AgentMessage, AgentRole, ConversationHistory};
pub use finding::{Finding, FindingKind, NO_EVIDENCE, chain_satisfied, parse_yes_no, satisfied_prefix_len};
pub use plan::{Plan, PlanStep, parse_plan};
pub use reasoning::{LoopAction, LoopTrace, TraceEntry, parse_action};
pub use state::{StateMachine, SupervisorState, parse_route};
