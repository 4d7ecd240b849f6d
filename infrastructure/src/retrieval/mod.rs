//! In-memory retrieval indexes
//!
//! - [`Bm25Index`]: Okapi BM25 lexical index
//! - [`VectorIndex`]: cosine-similarity index over embedder vectors
//!
//! Both implement the application [`Retriever`](gnsearch_application::Retriever)
//! port and are built once per process from the corpus documents.

mod bm25;
mod vector;

pub use bm25::{Bm25Index, Bm25Params};
pub use vector::VectorIndex;

use gnsearch_domain::RankedList;

/// Lowercase alphanumeric tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Order scored items and keep the best `k`
fn top_k(items: Vec<gnsearch_domain::RetrievedItem>, k: usize) -> RankedList {
    let mut ranked = RankedList::new(items).into_items();
    ranked.truncate(k);
    RankedList::new(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("gn:BXD is/has LOD-score 3.5"),
            vec!["gn", "bxd", "is", "has", "lod", "score", "3", "5"]
        );
        assert!(tokenize(" ,;: ").is_empty());
    }
}
