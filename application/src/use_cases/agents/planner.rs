//! Planner: decomposes the query into ordered steps.

use super::{AgentContext, AgentStep, StepEffect, StepOutcome};
use crate::config::SearchConfig;
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::shared::{CallError, Cancelled, complete_with_retry};
use async_trait::async_trait;
use gnsearch_domain::{AgentMessage, AgentRole, Plan, PromptTemplate, parse_plan};
use std::sync::Arc;
use tracing::{info, warn};

pub struct PlannerAgent {
    gateway: Arc<dyn LlmGateway>,
    config: Arc<SearchConfig>,
}

impl PlannerAgent {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: Arc<SearchConfig>) -> Self {
        Self { gateway, config }
    }
}

#[async_trait]
impl AgentStep for PlannerAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Planner
    }

    /// Never blocks on a bad plan: an empty or failed plan becomes a
    /// single step equal to the query.
    async fn step(&self, ctx: &AgentContext<'_>) -> Result<StepOutcome, Cancelled> {
        let request = PromptTemplate::planner(ctx.query);
        let steps = match complete_with_retry(
            self.gateway.as_ref(),
            &request,
            &self.config.execution,
            ctx.progress,
            ctx.token,
        )
        .await
        {
            Ok(response) => parse_plan(&response),
            Err(CallError::Cancelled) => return Err(Cancelled),
            Err(e) => {
                warn!(error = %e, "Planning failed");
                Vec::new()
            }
        };

        let plan = if steps.is_empty() {
            warn!("Planner produced no steps, using the query as the plan");
            Plan::single_step(ctx.query)
        } else {
            Plan::new(steps)
        };
        info!(steps = plan.len(), "Plan ready");
        ctx.progress.on_plan(&plan);

        Ok(StepOutcome {
            messages: vec![AgentMessage::new(AgentRole::Planner, plan.render())],
            effect: StepEffect::Plan(plan),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionParams;
    use crate::ports::llm_gateway::CompletionError;
    use crate::testing::ScriptedGateway;
    use crate::use_cases::agents::test_support::context;
    use gnsearch_domain::ConversationHistory;

    fn planner(gateway: ScriptedGateway) -> PlannerAgent {
        let config = SearchConfig::default()
            .with_execution(ExecutionParams::default().with_completion_retries(0));
        PlannerAgent::new(Arc::new(gateway), Arc::new(config))
    }

    async fn plan_of(agent: &PlannerAgent, query: &str) -> Plan {
        let plan = Plan::default();
        let history = ConversationHistory::new();
        let outcome = agent.step(&context(query, &plan, &[], &history)).await.unwrap();
        match outcome.effect {
            StepEffect::Plan(plan) => plan,
            other => panic!("expected a plan, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_plan_parsed() {
        let agent = planner(ScriptedGateway::new().respond(
            "planner",
            r#"[{"description": "find trait X"}, {"description": "find marker Y", "parallel": true}]"#,
        ));
        let plan = plan_of(&agent, "How are X and Y related?").await;
        assert_eq!(plan.len(), 2);
        assert!(plan.steps()[1].parallel);
    }

    #[tokio::test]
    async fn test_empty_plan_falls_back_to_query() {
        let agent = planner(ScriptedGateway::new().respond("planner", "[]"));
        let plan = plan_of(&agent, "What is BXD?").await;
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps()[0].description, "What is BXD?");
    }

    #[tokio::test]
    async fn test_failed_plan_falls_back_to_query() {
        let agent = planner(ScriptedGateway::new().fail("planner", CompletionError::Timeout));
        let plan = plan_of(&agent, "What is BXD?").await;
        assert_eq!(plan.steps()[0].description, "What is BXD?");
    }
}
