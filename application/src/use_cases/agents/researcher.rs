//! Researcher: rephrase → route → hybrid search → analyse, per batch step.
//!
//! Steps of a batch are researched concurrently; each gets its own
//! retrieval calls. The findings come back in plan order.

use super::{AgentContext, AgentStep, StepEffect, StepOutcome};
use crate::config::SearchConfig;
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::hybrid_search::{HybridSearch, HybridSearchError};
use crate::use_cases::query_router::QueryRouter;
use crate::use_cases::shared::{CallError, Cancelled, complete_with_retry};
use async_trait::async_trait;
use futures::future::join_all;
use gnsearch_domain::{AgentMessage, AgentRole, CompletionRequest, Finding, PlanStep, PromptTemplate};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ResearcherAgent {
    gateway: Arc<dyn LlmGateway>,
    router: QueryRouter,
    search: HybridSearch,
    config: Arc<SearchConfig>,
}

impl ResearcherAgent {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        router: QueryRouter,
        search: HybridSearch,
        config: Arc<SearchConfig>,
    ) -> Self {
        Self {
            gateway,
            router,
            search,
            config,
        }
    }

    async fn research(&self, step: &PlanStep, ctx: &AgentContext<'_>) -> Result<Finding, Cancelled> {
        ctx.progress.on_step_start(&step.description);
        let task = match ctx.follow_up {
            Some(questions) => format!("{}\n\nFollow-up questions:\n{}", step.description, questions),
            None => step.description.clone(),
        };

        let rephrase = PromptTemplate::rephrase(&task, ctx.history);
        let rephrased = match self.complete(&rephrase, ctx).await? {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => task.clone(),
            Err(e) => return Ok(Finding::degraded(&step.description, e)),
        };
        debug!(step = %step.description, rephrased = %rephrased, "Step rephrased");

        let routed = self.router.route(&rephrased, ctx.progress, ctx.token).await?;
        let context: Vec<(String, String)> = match self
            .search
            .search(&routed.search_text, routed.weights, ctx.token)
            .await
        {
            Ok(list) => list
                .into_items()
                .into_iter()
                .map(|item| (item.document_id.to_string(), item.text))
                .collect(),
            Err(HybridSearchError::NoEvidence(_)) => {
                info!(step = %step.description, "No evidence found");
                return Ok(Finding::no_evidence(&step.description));
            }
            Err(HybridSearchError::Cancelled) => return Err(Cancelled),
            Err(e @ HybridSearchError::Retrieval(_)) => {
                return Ok(Finding::degraded(&step.description, e));
            }
        };

        let analyze = PromptTemplate::analyze(&rephrased, &context, ctx.history);
        Ok(match self.complete(&analyze, ctx).await? {
            Ok(analysis) => Finding::evidence(&step.description, analysis.trim()),
            Err(e) => Finding::degraded(&step.description, e),
        })
    }

    /// Completion whose failure is a value, with cancellation split out
    async fn complete(
        &self,
        request: &CompletionRequest,
        ctx: &AgentContext<'_>,
    ) -> Result<Result<String, CallError>, Cancelled> {
        match complete_with_retry(
            self.gateway.as_ref(),
            request,
            &self.config.execution,
            ctx.progress,
            ctx.token,
        )
        .await
        {
            Err(CallError::Cancelled) => Err(Cancelled),
            Err(e) => {
                warn!(purpose = %request.purpose, error = %e, "Research call failed");
                Ok(Err(e))
            }
            Ok(text) => Ok(Ok(text)),
        }
    }
}

#[async_trait]
impl AgentStep for ResearcherAgent {
    fn role(&self) -> AgentRole {
        AgentRole::Researcher
    }

    async fn step(&self, ctx: &AgentContext<'_>) -> Result<StepOutcome, Cancelled> {
        let results = join_all(ctx.steps.iter().map(|step| self.research(step, ctx))).await;
        let findings = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        let messages = findings
            .iter()
            .map(|f| {
                ctx.progress.on_finding(f);
                AgentMessage::new(
                    AgentRole::Researcher,
                    format!("Step: {}\nFindings: {}", f.step, f.research),
                )
            })
            .collect();

        Ok(StepOutcome {
            messages,
            effect: StepEffect::Findings(findings),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionParams;
    use crate::ports::llm_gateway::CompletionError;
    use crate::ports::retriever::RetrievalError;
    use crate::testing::{MockRetriever, ScriptedGateway};
    use crate::use_cases::agents::test_support::context;
    use gnsearch_domain::RetrievalSource::{Lexical, Semantic};
    use gnsearch_domain::{ConversationHistory, FindingKind, NO_EVIDENCE, Plan};

    fn researcher(
        gateway: ScriptedGateway,
        lexical: MockRetriever,
        semantic: MockRetriever,
    ) -> (Arc<ScriptedGateway>, Arc<MockRetriever>, ResearcherAgent) {
        let gateway = Arc::new(gateway);
        let lexical = Arc::new(lexical);
        let config = Arc::new(
            SearchConfig::default()
                .with_execution(ExecutionParams::default().with_completion_retries(0)),
        );
        let router = QueryRouter::new(gateway.clone(), config.clone());
        let search = HybridSearch::new(lexical.clone(), Arc::new(semantic), config.clone());
        let agent = ResearcherAgent::new(gateway.clone(), router, search, config);
        (gateway, lexical, agent)
    }

    async fn findings(agent: &ResearcherAgent, plan: &Plan) -> Vec<Finding> {
        let history = ConversationHistory::new();
        let outcome = agent.step(&context("q", plan, &[], &history)).await.unwrap();
        match outcome.effect {
            StepEffect::Findings(findings) => findings,
            other => panic!("expected findings, got {:?}", other),
        }
    }

    fn corpus() -> (MockRetriever, MockRetriever) {
        (
            MockRetriever::new(Lexical, &[("Document 1", 4.0, "trait X is/has lod 3.1. ")]),
            MockRetriever::new(Semantic, &[("Document 1", 0.8, "trait X is/has lod 3.1. ")]),
        )
    }

    #[tokio::test]
    async fn test_keyword_step_searches_keywords() {
        let (lexical, semantic) = corpus();
        let (gateway, lexical, agent) = researcher(
            ScriptedGateway::new()
                .respond("rephrase", "lod score of trait X")
                .respond("classify_search", "keyword")
                .respond("extract_keywords", "trait X")
                .respond("analyze", "Trait X has a lod score of 3.1."),
            lexical,
            semantic,
        );

        let found = findings(&agent, &Plan::single_step("find trait X")).await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, FindingKind::Evidence);
        assert_eq!(found[0].research, "Trait X has a lod score of 3.1.");
        assert_eq!(lexical.queries(), vec!["trait X"]);
        let analyze = &gateway.requests("analyze")[0];
        assert!(analyze.user.contains("[Document 1]"));
    }

    #[tokio::test]
    async fn test_empty_corpus_skips_analysis() {
        let (gateway, _, agent) = researcher(
            ScriptedGateway::new()
                .respond("rephrase", "find trait X")
                .respond("classify_search", "semantic"),
            MockRetriever::empty(Lexical),
            MockRetriever::empty(Semantic),
        );

        let found = findings(&agent, &Plan::single_step("find trait X")).await;

        assert_eq!(found[0].kind, FindingKind::NoEvidence);
        assert_eq!(found[0].research, NO_EVIDENCE);
        assert_eq!(gateway.calls("analyze"), 0);
    }

    #[tokio::test]
    async fn test_failed_analysis_is_degraded() {
        let (lexical, semantic) = corpus();
        let (_, _, agent) = researcher(
            ScriptedGateway::new()
                .respond("rephrase", "x")
                .respond("classify_search", "semantic")
                .fail("analyze", CompletionError::ConnectionError("refused".into())),
            lexical,
            semantic,
        );

        let found = findings(&agent, &Plan::single_step("find trait X")).await;
        assert_eq!(found[0].kind, FindingKind::Degraded);
        assert!(found[0].research.contains("refused"));
    }

    #[tokio::test]
    async fn test_both_retrievers_down_is_degraded() {
        let (_, _, agent) = researcher(
            ScriptedGateway::new()
                .respond("rephrase", "x")
                .respond("classify_search", "semantic"),
            MockRetriever::failing(Lexical, RetrievalError::Index("gone".into())),
            MockRetriever::failing(Semantic, RetrievalError::Timeout),
        );

        let found = findings(&agent, &Plan::single_step("s")).await;
        assert_eq!(found[0].kind, FindingKind::Degraded);
    }

    #[tokio::test]
    async fn test_batch_keeps_plan_order() {
        let (lexical, semantic) = corpus();
        let (gateway, _, agent) = researcher(
            ScriptedGateway::new()
                .always("rephrase", "rephrased")
                .always("classify_search", "semantic")
                .always("analyze", "done"),
            lexical,
            semantic,
        );
        let plan = Plan::new(vec![
            PlanStep::parallel("step a"),
            PlanStep::parallel("step b"),
            PlanStep::parallel("step c"),
        ]);

        let found = findings(&agent, &plan).await;

        let steps: Vec<_> = found.iter().map(|f| f.step.as_str()).collect();
        assert_eq!(steps, vec!["step a", "step b", "step c"]);
        assert_eq!(gateway.calls("analyze"), 3);
    }
}
