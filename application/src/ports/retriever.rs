//! Retriever port
//!
//! Both the lexical and the semantic index answer the same call, so fusion
//! never needs to know which implementation produced a list.

use async_trait::async_trait;
use gnsearch_domain::{RankedList, RetrievalSource};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RetrievalError {
    #[error("Index error: {0}")]
    Index(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Retrieval timed out")]
    Timeout,
}

#[async_trait]
pub trait Retriever: Send + Sync {
    /// Which kind of evidence this retriever produces
    fn source(&self) -> RetrievalSource;

    /// Up to `k` documents for `query`, best first
    async fn search(&self, query: &str, k: usize) -> Result<RankedList, RetrievalError>;
}
