//! Hybrid retrieval: lexical and semantic search fused into one ranking.
//!
//! Both retrievers always run, concurrently, whatever the query's
//! classification; the classification only chooses the fusion weights.

use crate::config::SearchConfig;
use crate::ports::retriever::{RetrievalError, Retriever};
use crate::use_cases::shared::{Cancelled, cancellable, check_cancelled};
use gnsearch_domain::{FusionError, FusionWeight, RankedList, fuse};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HybridSearchError {
    /// Both retrievers answered with nothing.
    #[error(transparent)]
    NoEvidence(#[from] FusionError),

    /// Both retrievers failed.
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<Cancelled> for HybridSearchError {
    fn from(_: Cancelled) -> Self {
        HybridSearchError::Cancelled
    }
}

impl HybridSearchError {
    pub fn is_no_evidence(&self) -> bool {
        matches!(self, HybridSearchError::NoEvidence(_))
    }
}

pub struct HybridSearch {
    lexical: Arc<dyn Retriever>,
    semantic: Arc<dyn Retriever>,
    config: Arc<SearchConfig>,
}

impl HybridSearch {
    pub fn new(
        lexical: Arc<dyn Retriever>,
        semantic: Arc<dyn Retriever>,
        config: Arc<SearchConfig>,
    ) -> Self {
        Self {
            lexical,
            semantic,
            config,
        }
    }

    /// Search both indexes and fuse the results with `weights`.
    ///
    /// A single failing retriever is logged and contributes an empty list;
    /// only when both fail is the search itself an error.
    pub async fn search(
        &self,
        query: &str,
        weights: FusionWeight,
        token: &Option<CancellationToken>,
    ) -> Result<RankedList, HybridSearchError> {
        check_cancelled(token)?;
        let params = &self.config.retrieval;
        let timeout = self.config.execution.retrieval_timeout;

        let both = async {
            tokio::join!(
                retrieve(self.lexical.as_ref(), query, params.lexical_k, timeout),
                retrieve(self.semantic.as_ref(), query, params.semantic_k, timeout),
            )
        };
        let (lexical, semantic) = cancellable(both, token).await?;

        let lists = match (lexical, semantic) {
            (Err(l), Err(s)) => {
                return Err(HybridSearchError::Retrieval(format!(
                    "lexical: {}; semantic: {}",
                    l, s
                )));
            }
            (lexical, semantic) => [or_empty(lexical, "lexical"), or_empty(semantic, "semantic")],
        };

        debug!(
            lexical = lists[0].len(),
            semantic = lists[1].len(),
            weight = weights.lexical(),
            "Fusing retrieval results"
        );
        Ok(fuse(&lists, weights, params.top_k)?)
    }
}

async fn retrieve(
    retriever: &dyn Retriever,
    query: &str,
    k: usize,
    timeout: Duration,
) -> Result<RankedList, RetrievalError> {
    match tokio::time::timeout(timeout, retriever.search(query, k)).await {
        Ok(result) => result,
        Err(_) => Err(RetrievalError::Timeout),
    }
}

fn or_empty(result: Result<RankedList, RetrievalError>, side: &str) -> RankedList {
    result.unwrap_or_else(|e| {
        warn!(retriever = side, error = %e, "Retriever failed, continuing without it");
        RankedList::empty()
    })
}
