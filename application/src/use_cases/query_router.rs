//! Query routing: keyword vs semantic.
//!
//! The classification is advisory. It picks the fusion weights and, for
//! keyword queries, the text sent to the retrievers; hybrid retrieval runs
//! either way. Any failure to classify falls back to semantic.

use crate::config::SearchConfig;
use crate::ports::agent_progress::AgentProgressNotifier;
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::shared::{CallError, Cancelled, complete_with_retry};
use gnsearch_domain::{FusionWeight, PromptTemplate, SearchKind, parse_search_kind};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Retrieval plan for one query
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedQuery {
    pub kind: SearchKind,
    /// Keywords for keyword queries, the query itself otherwise
    pub search_text: String,
    pub weights: FusionWeight,
}

pub struct QueryRouter {
    gateway: Arc<dyn LlmGateway>,
    config: Arc<SearchConfig>,
}

impl QueryRouter {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: Arc<SearchConfig>) -> Self {
        Self { gateway, config }
    }

    /// Classify a query. Only cancellation is reported as an error.
    pub async fn classify(
        &self,
        query: &str,
        progress: &dyn AgentProgressNotifier,
        token: &Option<CancellationToken>,
    ) -> Result<SearchKind, Cancelled> {
        let request = PromptTemplate::classify_search(query);
        match complete_with_retry(
            self.gateway.as_ref(),
            &request,
            &self.config.execution,
            progress,
            token,
        )
        .await
        {
            Ok(response) => Ok(parse_search_kind(&response)),
            Err(CallError::Cancelled) => Err(Cancelled),
            Err(e) => {
                warn!(error = %e, "Search classification failed, defaulting to semantic");
                Ok(SearchKind::Semantic)
            }
        }
    }

    /// Keywords featured in a query; the query itself when none come back.
    pub async fn extract_keywords(
        &self,
        query: &str,
        progress: &dyn AgentProgressNotifier,
        token: &Option<CancellationToken>,
    ) -> Result<String, Cancelled> {
        let request = PromptTemplate::extract_keywords(query);
        match complete_with_retry(
            self.gateway.as_ref(),
            &request,
            &self.config.execution,
            progress,
            token,
        )
        .await
        {
            Ok(response) => {
                let keywords = response.split_whitespace().collect::<Vec<_>>().join(" ");
                if keywords.is_empty() {
                    Ok(query.to_string())
                } else {
                    Ok(keywords)
                }
            }
            Err(CallError::Cancelled) => Err(Cancelled),
            Err(e) => {
                warn!(error = %e, "Keyword extraction failed, searching the raw query");
                Ok(query.to_string())
            }
        }
    }

    /// Classify, then derive the search text and weights.
    pub async fn route(
        &self,
        query: &str,
        progress: &dyn AgentProgressNotifier,
        token: &Option<CancellationToken>,
    ) -> Result<RoutedQuery, Cancelled> {
        let kind = self.classify(query, progress, token).await?;
        let search_text = match kind {
            SearchKind::Keyword => self.extract_keywords(query, progress, token).await?,
            SearchKind::Semantic => query.to_string(),
        };
        let weights = self.config.retrieval.weights_for(kind);
        debug!(kind = %kind, search_text = %search_text, "Query routed");

        Ok(RoutedQuery {
            kind,
            search_text,
            weights,
        })
    }
}
