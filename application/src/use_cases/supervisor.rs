//! Supervisor: the per-query state machine over the agents.
//!
//! ```text
//! PLANNING → RESEARCHING → CONSULTING_EXPERT → REFLECTING ─┬→ RESEARCHING ...
//!                                                          └→ FINALIZING → DONE
//! ```
//!
//! One supervisor run owns the conversation history, the plan cursor and
//! the findings. Agents only read a snapshot; their messages are appended
//! in one `extend` after each step, so a cancelled run never leaves a
//! half-applied step behind. On cancellation the whole session is dropped.
//!
//! After REFLECTING the next state is a routing decision, restricted to the
//! worker states other than the one that ran last, plus FINALIZING. The
//! choice is then coerced so the plan is completed before finalizing and
//! follow-up rounds stay within `max_follow_ups`. A global cap on
//! transitions forces FINALIZING with whatever has accumulated.
//!
//! An expert run that ends without an answer degrades its finding, and any
//! degraded finding makes the final status `Degraded`.

use crate::config::SearchConfig;
use crate::ports::agent_progress::AgentProgressNotifier;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::agents::{AgentContext, Agents, ExpertOutcome, StepEffect, StepOutcome};
use crate::use_cases::shared::{CallError, Cancelled, check_cancelled, complete_with_retry};
use gnsearch_domain::{
    AgentMessage, AnswerStatus, ConversationHistory, DomainError, FinalAnswer, Finding, Plan,
    PromptTemplate, Query, StateMachine, SupervisorState, parse_route,
};
use std::ops::Range;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("State machine violation: {0}")]
    InvalidTransition(#[from] DomainError),
}

impl From<Cancelled> for SupervisorError {
    fn from(_: Cancelled) -> Self {
        SupervisorError::Cancelled
    }
}

/// Where to go after REFLECTING
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RouteDecision {
    /// Start the next batch of plan steps
    Research,
    /// Re-run the last batch with the critic's questions
    FollowUp,
    Finalize,
}

/// States the routing call may pick from: every worker except the one that
/// ran last, and FINALIZING.
pub(crate) fn route_options(machine: &StateMachine) -> Vec<SupervisorState> {
    let last = machine.last_worker();
    [SupervisorState::Researching, SupervisorState::ConsultingExpert]
        .into_iter()
        .filter(|state| Some(*state) != last)
        .chain([SupervisorState::Finalizing])
        .collect()
}

/// Coerce a routing choice.
///
/// `choice` is `None` when the call failed or named something outside the
/// allowed options.
pub(crate) fn decide_route(
    choice: Option<SupervisorState>,
    remaining_steps: usize,
    follow_ups_left: bool,
) -> RouteDecision {
    match choice {
        _ if remaining_steps > 0 => RouteDecision::Research,
        None | Some(SupervisorState::Finalizing) => RouteDecision::Finalize,
        Some(_) if follow_ups_left => RouteDecision::FollowUp,
        Some(_) => RouteDecision::Finalize,
    }
}

/// Everything one run owns
struct Session {
    machine: StateMachine,
    history: ConversationHistory,
    plan: Plan,
    cursor: usize,
    batch: Range<usize>,
    follow_up: Option<String>,
    follow_ups_used: usize,
    critique: Option<String>,
    /// Research of the current batch, waiting for the expert
    pending: Vec<Finding>,
    findings: Vec<Finding>,
    trace_summary: Vec<String>,
    outcome: Option<(String, AnswerStatus, Vec<Finding>)>,
    step_cap_reached: bool,
}

impl Session {
    fn new(query: &str) -> Self {
        let mut history = ConversationHistory::new();
        history.push(AgentMessage::user(query));
        Self {
            machine: StateMachine::new(),
            history,
            plan: Plan::default(),
            cursor: 0,
            batch: 0..0,
            follow_up: None,
            follow_ups_used: 0,
            critique: None,
            pending: Vec::new(),
            findings: Vec::new(),
            trace_summary: Vec::new(),
            outcome: None,
            step_cap_reached: false,
        }
    }

    fn remaining_steps(&self) -> usize {
        self.plan.len().saturating_sub(self.cursor)
    }

    fn start_batch(&mut self) {
        self.batch = self.plan.batch_at(self.cursor);
        self.cursor = self.batch.end;
        self.follow_up = None;
    }

    fn start_follow_up(&mut self) {
        self.follow_ups_used += 1;
        self.follow_up = self.critique.clone();
    }

    fn context<'a>(
        &'a self,
        query: &'a str,
        progress: &'a dyn AgentProgressNotifier,
        token: &'a Option<CancellationToken>,
    ) -> AgentContext<'a> {
        let findings: &[Finding] = match self.machine.current() {
            SupervisorState::ConsultingExpert => &self.pending,
            SupervisorState::Finalizing => &self.findings,
            _ => &[],
        };
        AgentContext {
            query,
            plan: &self.plan,
            steps: self.plan.steps().get(self.batch.clone()).unwrap_or_default(),
            follow_up: self.follow_up.as_deref(),
            findings,
            history: &self.history,
            progress,
            token,
        }
    }

    fn into_answer(self, query: &str) -> FinalAnswer {
        let (answer, status, used) = self.outcome.unwrap_or_else(|| {
            (
                FinalAnswer::fallback_text(&self.findings),
                AnswerStatus::Degraded,
                self.findings.clone(),
            )
        });
        let degraded = self.findings.iter().any(Finding::is_degraded);
        let status = match status {
            AnswerStatus::Complete if degraded => AnswerStatus::Degraded,
            AnswerStatus::Complete if self.step_cap_reached => AnswerStatus::StepCapReached,
            status => status,
        };

        FinalAnswer {
            query: query.to_string(),
            answer,
            status,
            findings_used: used,
            plan: self.plan,
            history: self.history.into_messages(),
            trace_summary: self.trace_summary,
        }
    }
}

pub struct Supervisor {
    agents: Agents,
    gateway: Arc<dyn LlmGateway>,
    config: Arc<SearchConfig>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Supervisor {
    pub fn new(agents: Agents, gateway: Arc<dyn LlmGateway>, config: Arc<SearchConfig>) -> Self {
        Self {
            agents,
            gateway,
            config,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.agents = self.agents.with_conversation_logger(logger.clone());
        self.conversation_logger = logger;
        self
    }

    /// Answer one validated query.
    pub async fn run(
        &self,
        query: &Query,
        progress: &dyn AgentProgressNotifier,
        token: &Option<CancellationToken>,
    ) -> Result<FinalAnswer, SupervisorError> {
        let query = query.content();
        let mut session = Session::new(query);
        info!(query, "Supervisor started");

        while let Some(agent) = self.agents.for_state(session.machine.current()) {
            check_cancelled(token)?;
            let outcome = {
                let ctx = session.context(query, progress, token);
                agent.step(&ctx).await?
            };
            let next = self
                .apply(&mut session, outcome, query, progress, token)
                .await?;
            self.transition(&mut session, next, progress)?;
        }

        let answer = session.into_answer(query);
        info!(status = %answer.status, findings = answer.findings_used.len(), "Supervisor finished");
        progress.on_complete(answer.status);
        self.conversation_logger.log(ConversationEvent::new(
            "final_answer",
            serde_json::json!({
                "status": answer.status.as_str(),
                "findings_used": answer.findings_used.len(),
                "text": answer.answer,
            }),
        ));
        Ok(answer)
    }

    /// Fold one agent step into the session and pick the next state.
    async fn apply(
        &self,
        session: &mut Session,
        outcome: StepOutcome,
        query: &str,
        progress: &dyn AgentProgressNotifier,
        token: &Option<CancellationToken>,
    ) -> Result<SupervisorState, Cancelled> {
        for message in &outcome.messages {
            self.conversation_logger.log(ConversationEvent::new(
                "agent_message",
                serde_json::json!({
                    "role": message.role.as_str(),
                    "content": message.content,
                }),
            ));
        }
        session.history.extend(outcome.messages);

        let next = match outcome.effect {
            StepEffect::Plan(plan) => {
                session.plan = plan;
                session.start_batch();
                SupervisorState::Researching
            }
            StepEffect::Findings(findings) => {
                session.pending = findings;
                SupervisorState::ConsultingExpert
            }
            StepEffect::ExpertAnswers {
                outcomes,
                trace_summary,
            } => {
                let pending = std::mem::take(&mut session.pending);
                for (finding, outcome) in pending.into_iter().zip(outcomes) {
                    let finding = match outcome {
                        ExpertOutcome::Answered(answer) => finding.with_expert(answer),
                        failed => {
                            warn!(step = %finding.step, outcome = %failed.text(), "Expert step incomplete");
                            finding.with_expert_failure(failed.text())
                        }
                    };
                    session.findings.push(finding);
                }
                session.trace_summary.extend(trace_summary);
                SupervisorState::Reflecting
            }
            StepEffect::Critique(critique) => {
                session.critique = critique;
                self.route(session, query, progress, token).await?
            }
            StepEffect::Final {
                answer,
                status,
                used,
            } => {
                session.outcome = Some((answer, status, used));
                SupervisorState::Done
            }
        };
        Ok(next)
    }

    /// Routing decision after REFLECTING
    async fn route(
        &self,
        session: &mut Session,
        query: &str,
        progress: &dyn AgentProgressNotifier,
        token: &Option<CancellationToken>,
    ) -> Result<SupervisorState, Cancelled> {
        let options = route_options(&session.machine);
        let names: Vec<&str> = options.iter().map(|s| s.route_name()).collect();
        let remaining = session.remaining_steps();
        let request =
            PromptTemplate::route(query, &session.plan, remaining, &session.history, &names);

        let choice = match complete_with_retry(
            self.gateway.as_ref(),
            &request,
            &self.config.execution,
            progress,
            token,
        )
        .await
        {
            Ok(response) => {
                let parsed = parse_route(&response);
                let allowed = parsed.filter(|state| options.contains(state));
                if parsed.is_some() && allowed.is_none() {
                    warn!(response = %response.trim(), "Routing chose a disallowed state");
                }
                allowed
            }
            Err(CallError::Cancelled) => return Err(Cancelled),
            Err(e) => {
                warn!(error = %e, "Routing call failed");
                None
            }
        };

        let follow_ups_left = session.follow_ups_used < self.config.execution.max_follow_ups;
        let decision = decide_route(choice, remaining, follow_ups_left);
        debug!(?choice, ?decision, remaining, "Route decided");

        Ok(match decision {
            RouteDecision::Research => {
                session.start_batch();
                SupervisorState::Researching
            }
            RouteDecision::FollowUp => {
                session.start_follow_up();
                SupervisorState::Researching
            }
            RouteDecision::Finalize => SupervisorState::Finalizing,
        })
    }

    fn transition(
        &self,
        session: &mut Session,
        mut next: SupervisorState,
        progress: &dyn AgentProgressNotifier,
    ) -> Result<(), DomainError> {
        let from = session.machine.current();
        let cap = self.config.execution.max_transitions;

        if !matches!(next, SupervisorState::Finalizing | SupervisorState::Done)
            && session.machine.transitions() >= cap
        {
            warn!(cap, from = %from, "Step cap reached, finalizing");
            next = SupervisorState::Finalizing;
            session.step_cap_reached = true;
            let pending = std::mem::take(&mut session.pending);
            session.findings.extend(pending);
        }

        session.machine.transition(next)?;
        debug!(from = %from, to = %next, "State transition");
        progress.on_state_change(from, next);
        self.conversation_logger.log(ConversationEvent::new(
            "state_transition",
            serde_json::json!({
                "from": from.as_str(),
                "to": next.as_str(),
                "transitions": session.machine.transitions(),
            }),
        ));
        Ok(())
    }
}
