//! Finalizer: judge findings left to right, synthesize from the satisfied
//! prefix.
//!
//! Later steps are assumed to build on earlier ones, so the first finding
//! judged unsatisfactory ends the chain; neither it nor anything after it
//! reaches the synthesis.
//!
//! The satisfied prefix is condensed into a bullet summary first. Synthesis
//! sees both the step results and the summary; a failed summary is skipped.

use super::{AgentContext, AgentStep, StepEffect, StepOutcome};
use crate::config::SearchConfig;
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::shared::{CallError, Cancelled, complete_with_retry};
use async_trait::async_trait;
use gnsearch_domain::{
    AgentMessage, AgentRole, AnswerStatus, CompletionRequest, FinalAnswer, Finding, PromptTemplate,
    chain_satisfied, parse_yes_no,
};
use std::sync::Arc;
use tracing::{info, warn};

pub struct FinalizerAgent {
    gateway: Arc<dyn LlmGateway>,
    config: Arc<SearchConfig>,
}

impl FinalizerAgent {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: Arc<SearchConfig>) -> Self {
        Self { gateway, config }
    }

    /// Verdicts up to and including the first "no". A failed judgement is a "no".
    async fn judge(&self, ctx: &AgentContext<'_>) -> Result<Vec<bool>, Cancelled> {
        let mut verdicts = Vec::with_capacity(ctx.findings.len());
        for finding in ctx.findings {
            let request = PromptTemplate::judge_satisfaction(ctx.query, finding);
            let satisfied = match self.complete(&request, ctx).await {
                Ok(response) => parse_yes_no(&response),
                Err(CallError::Cancelled) => return Err(Cancelled),
                Err(e) => {
                    warn!(step = %finding.step, error = %e, "Judgement failed, treating as unsatisfied");
                    false
                }
            };
            verdicts.push(satisfied);
            if !satisfied {
                info!(step = %finding.step, "Finding chain broken");
                break;
            }
        }
        Ok(verdicts)
    }

    async fn summarize(&self, used: &[Finding], ctx: &AgentContext<'_>) -> Result<Option<String>, Cancelled> {
        if used.is_empty() {
            return Ok(None);
        }
        let request = PromptTemplate::summarize(ctx.query, used);
        match self.complete(&request, ctx).await {
            Ok(text) => Ok(Some(text.trim().to_string()).filter(|t| !t.is_empty())),
            Err(CallError::Cancelled) => Err(Cancelled),
            Err(e) => {
                warn!(error = %e, "Summary failed, synthesizing from findings alone");
                Ok(None)
            }
        }
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        ctx: &AgentContext<'_>,
    ) -> Result<String, CallError> {
        complete_with_retry(
            self.gateway.as_ref(),
            request,
            &self.config.execution,
            ctx.progress,
            ctx.token,
        )
        .await
    }
}

#[async_trait]
impl AgentStep for FinalizerAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Supervisor
    }

    async fn step(&self, ctx: &AgentContext<'_>) -> Result<StepOutcome, Cancelled> {
        let verdicts = self.judge(ctx).await?;
        let used: Vec<Finding> = chain_satisfied(ctx.findings, &verdicts).to_vec();
        info!(used = used.len(), total = ctx.findings.len(), "Synthesizing answer");

        let summary = self.summarize(&used, ctx).await?;
        let request = PromptTemplate::finalize(ctx.query, &used, summary.as_deref());
        let (answer, status) = match self.complete(&request, ctx).await {
            Ok(text) => (text.trim().to_string(), AnswerStatus::Complete),
            Err(CallError::Cancelled) => return Err(Cancelled),
            Err(e) => {
                warn!(error = %e, "Synthesis failed, answering from raw findings");
                (FinalAnswer::fallback_text(&used), AnswerStatus::Degraded)
            }
        };

        Ok(StepOutcome {
            messages: vec![AgentMessage::supervisor(answer.clone())],
            effect: StepEffect::Final {
                answer,
                status,
                used,
            },
        })
    }
}
