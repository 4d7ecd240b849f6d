//! Single-shot search: route, retrieve, answer from the fused context.

use crate::config::SearchConfig;
use crate::ports::agent_progress::AgentProgressNotifier;
use crate::ports::llm_gateway::{CompletionError, LlmGateway};
use crate::use_cases::hybrid_search::{HybridSearch, HybridSearchError};
use crate::use_cases::query_router::QueryRouter;
use crate::use_cases::shared::{CallError, Cancelled, complete_with_retry};
use gnsearch_domain::{
    DomainError, NO_EVIDENCE, PromptTemplate, Query, RetrievedItem, SearchAnswer, SearchKind,
    parse_search_answer,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid query: {0}")]
    Validation(#[from] DomainError),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Answer generation failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<Cancelled> for SearchError {
    fn from(_: Cancelled) -> Self {
        SearchError::Cancelled
    }
}

impl From<CallError> for SearchError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Completion(e) => SearchError::Completion(e),
            CallError::Cancelled => SearchError::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub kind: SearchKind,
    /// Text actually sent to the retrievers
    pub search_text: String,
    pub answer: SearchAnswer,
    /// Fused context the answer was generated from
    pub documents: Vec<RetrievedItem>,
}

pub struct SearchUseCase {
    gateway: Arc<dyn LlmGateway>,
    router: QueryRouter,
    search: HybridSearch,
    config: Arc<SearchConfig>,
    cancellation_token: Option<CancellationToken>,
}

impl SearchUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        search: HybridSearch,
        config: Arc<SearchConfig>,
    ) -> Self {
        Self {
            router: QueryRouter::new(gateway.clone(), config.clone()),
            gateway,
            search,
            config,
            cancellation_token: None,
        }
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub async fn search(
        &self,
        query: &str,
        progress: &dyn AgentProgressNotifier,
    ) -> Result<SearchOutput, SearchError> {
        let token = &self.cancellation_token;
        let query = Query::parse(query, self.config.max_query_length)?;
        let routed = self.router.route(query.content(), progress, token).await?;

        let documents = match self
            .search
            .search(&routed.search_text, routed.weights, token)
            .await
        {
            Ok(list) => list.into_items(),
            Err(HybridSearchError::NoEvidence(_)) => Vec::new(),
            Err(HybridSearchError::Cancelled) => return Err(SearchError::Cancelled),
            Err(HybridSearchError::Retrieval(e)) => return Err(SearchError::Retrieval(e)),
        };
        info!(kind = %routed.kind, documents = documents.len(), "Context retrieved");

        let answer = if documents.is_empty() {
            SearchAnswer {
                detailed_answers: Vec::new(),
                final_answer: NO_EVIDENCE.to_string(),
            }
        } else {
            let context: Vec<(String, String)> = documents
                .iter()
                .map(|d| (d.document_id.to_string(), d.text.clone()))
                .collect();
            let request = PromptTemplate::rag_answer(query.content(), &context);
            let response = complete_with_retry(
                self.gateway.as_ref(),
                &request,
                &self.config.execution,
                progress,
                token,
            )
            .await?;
            parse_search_answer(&response)
        };

        Ok(SearchOutput {
            query: query.into_content(),
            kind: routed.kind,
            search_text: routed.search_text,
            answer,
            documents,
        })
    }
}
