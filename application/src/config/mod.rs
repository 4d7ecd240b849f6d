//! Application-level configuration.
//!
//! One [`SearchConfig`] is built at startup and shared by reference with
//! every use case:
//!
//! - [`ExecutionParams`]: loop budgets, step cap, retries and timeouts
//! - [`RetrievalParams`]: retriever depths and fusion weights

pub mod execution_params;
pub mod retrieval_params;

pub use execution_params::ExecutionParams;
pub use retrieval_params::RetrievalParams;

use gnsearch_domain::DEFAULT_MAX_QUERY_LENGTH;
use serde::{Deserialize, Serialize};

/// Everything the use cases need to know, built once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub execution: ExecutionParams,
    pub retrieval: RetrievalParams,
    /// Longest accepted query, in characters
    pub max_query_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            execution: ExecutionParams::default(),
            retrieval: RetrievalParams::default(),
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
        }
    }
}

impl SearchConfig {
    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_retrieval(mut self, retrieval: RetrievalParams) -> Self {
        self.retrieval = retrieval;
        self
    }

    pub fn with_max_query_length(mut self, max: usize) -> Self {
        self.max_query_length = max;
        self
    }
}
