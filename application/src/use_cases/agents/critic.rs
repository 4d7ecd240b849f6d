//! Critic: follow-up questions on the work so far. Advisory only.

use super::{AgentContext, AgentStep, StepEffect, StepOutcome};
use crate::config::SearchConfig;
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::shared::{CallError, Cancelled, complete_with_retry};
use async_trait::async_trait;
use gnsearch_domain::{AgentMessage, AgentRole, PromptTemplate};
use std::sync::Arc;
use tracing::warn;

pub struct CriticAgent {
    gateway: Arc<dyn LlmGateway>,
    config: Arc<SearchConfig>,
}

impl CriticAgent {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: Arc<SearchConfig>) -> Self {
        Self { gateway, config }
    }
}

#[async_trait]
impl AgentStep for CriticAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Critic
    }

    async fn step(&self, ctx: &AgentContext<'_>) -> Result<StepOutcome, Cancelled> {
        let request = PromptTemplate::critic(ctx.query, ctx.history);
        let critique = match complete_with_retry(
            self.gateway.as_ref(),
            &request,
            &self.config.execution,
            ctx.progress,
            ctx.token,
        )
        .await
        {
            Ok(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
            Err(CallError::Cancelled) => return Err(Cancelled),
            Err(e) => {
                warn!(error = %e, "Critique failed");
                None
            }
        };

        let note = critique.clone().unwrap_or_else(|| "No critique available.".to_string());
        Ok(StepOutcome {
            messages: vec![AgentMessage::new(AgentRole::Critic, note)],
            effect: StepEffect::Critique(critique),
        })
    }
}
