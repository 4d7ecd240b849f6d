//! Expert: one reason/act loop per batch step, goal = step + its research.

use super::{AgentContext, AgentStep, ExpertOutcome, StepEffect, StepOutcome};
use crate::config::SearchConfig;
use crate::ports::conversation_logger::ConversationLogger;
use crate::use_cases::reason_act::{LoopError, ReasonActLoop};
use crate::use_cases::shared::Cancelled;
use async_trait::async_trait;
use futures::future::join_all;
use gnsearch_domain::{AgentMessage, AgentRole, Finding, PlanStep};
use std::sync::Arc;
use tracing::warn;

pub struct ExpertAgent {
    reason_act: ReasonActLoop,
    config: Arc<SearchConfig>,
}

impl ExpertAgent {
    pub fn new(reason_act: ReasonActLoop, config: Arc<SearchConfig>) -> Self {
        Self { reason_act, config }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.reason_act = self.reason_act.with_conversation_logger(logger);
        self
    }

    fn goal(step: &PlanStep, finding: Option<&Finding>, follow_up: Option<&str>) -> String {
        let mut goal = format!("Task: {}", step.description);
        if let Some(finding) = finding {
            goal.push_str(&format!("\n\nResearch findings:\n{}", finding.research));
        }
        if let Some(questions) = follow_up {
            goal.push_str(&format!("\n\nFollow-up questions:\n{}", questions));
        }
        goal
    }

    /// How the loop ended for one step, with its trace summary
    async fn consult(
        &self,
        step: &PlanStep,
        finding: Option<&Finding>,
        ctx: &AgentContext<'_>,
    ) -> Result<(ExpertOutcome, Vec<String>), Cancelled> {
        let goal = Self::goal(step, finding, ctx.follow_up);
        let budget = self.config.execution.loop_budget;

        match self.reason_act.run(&goal, budget, ctx.progress, ctx.token).await {
            Ok(outcome) => Ok((ExpertOutcome::Answered(outcome.answer), outcome.trace.summary())),
            Err(LoopError::Cancelled) => Err(Cancelled),
            Err(LoopError::BudgetExceeded { budget, trace }) => {
                warn!(step = %step.description, budget, "Expert ran out of steps");
                let failures = trace.failures();
                Ok((
                    ExpertOutcome::BudgetExceeded { budget, failures },
                    trace.summary(),
                ))
            }
            Err(LoopError::Completion { source, trace }) => {
                warn!(step = %step.description, error = %source, "Expert unavailable");
                Ok((ExpertOutcome::Unavailable(source), trace.summary()))
            }
        }
    }
}

#[async_trait]
impl AgentStep for ExpertAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Expert
    }

    async fn step(&self, ctx: &AgentContext<'_>) -> Result<StepOutcome, Cancelled> {
        let runs = ctx
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| self.consult(step, ctx.findings.get(i), ctx));
        let results = join_all(runs).await.into_iter().collect::<Result<Vec<_>, _>>()?;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut trace_summary = Vec::new();
        let mut messages = Vec::with_capacity(results.len());
        for (step, (outcome, summary)) in ctx.steps.iter().zip(results) {
            messages.push(AgentMessage::new(
                AgentRole::Expert,
                format!("Step: {}\nAnswer: {}", step.description, outcome.text()),
            ));
            trace_summary.extend(summary);
            outcomes.push(outcome);
        }

        Ok(StepOutcome {
            messages,
            effect: StepEffect::ExpertAnswers {
                outcomes,
                trace_summary,
            },
        })
    }
}
