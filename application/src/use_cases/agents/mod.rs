//! The agents the supervisor sequences.
//!
//! Every agent implements [`AgentStep`]: it reads an [`AgentContext`]
//! snapshot of the supervisor's session and returns the messages it wants
//! appended plus a typed [`StepEffect`]. Agents never touch the history
//! themselves; the supervisor applies each outcome in one go.

mod critic;
mod expert;
mod finalizer;
mod planner;
mod researcher;

pub use critic::CriticAgent;
pub use expert::ExpertAgent;
pub use finalizer::FinalizerAgent;
pub use planner::PlannerAgent;
pub use researcher::ResearcherAgent;

use crate::config::SearchConfig;
use crate::ports::agent_progress::AgentProgressNotifier;
use crate::ports::conversation_logger::ConversationLogger;
use crate::ports::llm_gateway::{CompletionError, LlmGateway};
use crate::ports::retriever::Retriever;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::hybrid_search::HybridSearch;
use crate::use_cases::query_router::QueryRouter;
use crate::use_cases::reason_act::ReasonActLoop;
use crate::use_cases::shared::Cancelled;
use async_trait::async_trait;
use gnsearch_domain::{
    AgentMessage, AgentRole, AnswerStatus, ConversationHistory, Finding, Plan, PlanStep,
    SupervisorState,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Read-only view of the session handed to an agent
pub struct AgentContext<'a> {
    pub query: &'a str,
    pub plan: &'a Plan,
    /// Steps of the batch being worked on
    pub steps: &'a [PlanStep],
    /// Critic questions when the batch is being re-run
    pub follow_up: Option<&'a str>,
    /// Findings relevant to this step: the batch's research for the expert,
    /// every accumulated finding for the finalizer
    pub findings: &'a [Finding],
    pub history: &'a ConversationHistory,
    pub progress: &'a dyn AgentProgressNotifier,
    pub token: &'a Option<CancellationToken>,
}

/// What an agent step produced, beyond its messages
#[derive(Debug, Clone)]
pub enum StepEffect {
    Plan(Plan),
    /// One finding per batch step, in plan order
    Findings(Vec<Finding>),
    /// One outcome per batch step, in plan order
    ExpertAnswers {
        outcomes: Vec<ExpertOutcome>,
        trace_summary: Vec<String>,
    },
    /// `None` when the critic call failed
    Critique(Option<String>),
    Final {
        answer: String,
        status: AnswerStatus,
        used: Vec<Finding>,
    },
}

/// How one expert loop run ended
#[derive(Debug, Clone, PartialEq)]
pub enum ExpertOutcome {
    Answered(String),
    /// The loop used its whole budget without answering
    BudgetExceeded { budget: usize, failures: usize },
    /// The completion capability kept failing
    Unavailable(CompletionError),
}

impl ExpertOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, ExpertOutcome::Answered(_))
    }

    /// Answer text, or a note naming why there is none
    pub fn text(&self) -> String {
        match self {
            ExpertOutcome::Answered(answer) => answer.clone(),
            ExpertOutcome::BudgetExceeded { budget, failures } => format!(
                "Unfinished: no answer within {} tool steps ({} failed).",
                budget, failures
            ),
            ExpertOutcome::Unavailable(e) => format!("Unavailable: {}", e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub messages: Vec<AgentMessage>,
    pub effect: StepEffect,
}

/// One agent's contribution to a supervisor state.
///
/// Recoverable failures are folded into the effect (a degraded finding, a
/// fallback plan); only cancellation is an error.
#[async_trait]
pub trait AgentStep: Send + Sync {
    fn role(&self) -> AgentRole;

    async fn step(&self, ctx: &AgentContext<'_>) -> Result<StepOutcome, Cancelled>;
}

/// The full set of agents, one per working state
pub struct Agents {
    pub planner: PlannerAgent,
    pub researcher: ResearcherAgent,
    pub expert: ExpertAgent,
    pub critic: CriticAgent,
    pub finalizer: FinalizerAgent,
}

impl Agents {
    /// Wire every agent to the same gateway and configuration.
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        lexical: Arc<dyn Retriever>,
        semantic: Arc<dyn Retriever>,
        tools: Arc<dyn ToolExecutorPort>,
        config: Arc<SearchConfig>,
    ) -> Self {
        let router = QueryRouter::new(gateway.clone(), config.clone());
        let search = HybridSearch::new(lexical, semantic, config.clone());
        let reason_act = ReasonActLoop::new(gateway.clone(), tools, config.clone());

        Self {
            planner: PlannerAgent::new(gateway.clone(), config.clone()),
            researcher: ResearcherAgent::new(gateway.clone(), router, search, config.clone()),
            expert: ExpertAgent::new(reason_act, config.clone()),
            critic: CriticAgent::new(gateway.clone(), config.clone()),
            finalizer: FinalizerAgent::new(gateway, config),
        }
    }

    /// Route tool calls and results of the expert's loop to a transcript log
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.expert = self.expert.with_conversation_logger(logger);
        self
    }

    /// The agent that does the work of `state`
    pub fn for_state(&self, state: SupervisorState) -> Option<&dyn AgentStep> {
        match state {
            SupervisorState::Planning => Some(&self.planner),
            SupervisorState::Researching => Some(&self.researcher),
            SupervisorState::ConsultingExpert => Some(&self.expert),
            SupervisorState::Reflecting => Some(&self.critic),
            SupervisorState::Finalizing => Some(&self.finalizer),
            SupervisorState::Done => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::ports::agent_progress::NoAgentProgress;

    pub static NO_PROGRESS: NoAgentProgress = NoAgentProgress;

    /// Context with an empty history and no cancellation
    pub fn context<'a>(
        query: &'a str,
        plan: &'a Plan,
        findings: &'a [Finding],
        history: &'a ConversationHistory,
    ) -> AgentContext<'a> {
        AgentContext {
            query,
            plan,
            steps: plan.steps(),
            follow_up: None,
            findings,
            history,
            progress: &NO_PROGRESS,
            token: &None,
        }
    }
}
