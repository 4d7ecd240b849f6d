//! Cosine-similarity vector index

use super::top_k;
use async_trait::async_trait;
use gnsearch_application::{Embedder, RetrievalError, Retriever};
use gnsearch_domain::{Document, RankedList, RetrievalSource, RetrievedItem};
use std::sync::Arc;
use tracing::{debug, info};

struct EmbeddedDocument {
    document: Document,
    /// Unit-length vector, or `None` when the embedding was all zeros or not finite
    vector: Option<Vec<f32>>,
}

/// Semantic index: documents are embedded once at build time, queries on
/// every search.
pub struct VectorIndex {
    embedder: Arc<dyn Embedder>,
    documents: Vec<EmbeddedDocument>,
}

impl VectorIndex {
    pub async fn build(
        documents: Vec<Document>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, RetrievalError> {
        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let vectors = embedder
            .embed(&texts)
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;

        if vectors.len() != documents.len() {
            return Err(RetrievalError::Index(format!(
                "embedded {} of {} documents",
                vectors.len(),
                documents.len()
            )));
        }

        let documents: Vec<EmbeddedDocument> = documents
            .into_iter()
            .zip(vectors)
            .map(|(document, vector)| EmbeddedDocument {
                document,
                vector: normalize(vector),
            })
            .collect();

        info!(documents = documents.len(), "Built vector index");
        Ok(Self {
            embedder,
            documents,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Unit-length copy, or `None` for a zero or non-finite vector.
fn normalize(mut vector: Vec<f32>) -> Option<Vec<f32>> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if !norm.is_finite() || norm <= f32::EPSILON {
        return None;
    }
    vector.iter_mut().for_each(|x| *x /= norm);
    Some(vector)
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(x, y)| f64::from(x * y)).sum()
}

#[async_trait]
impl Retriever for VectorIndex {
    fn source(&self) -> RetrievalSource {
        RetrievalSource::Semantic
    }

    async fn search(&self, query: &str, k: usize) -> Result<RankedList, RetrievalError> {
        if self.documents.is_empty() || k == 0 {
            return Ok(RankedList::empty());
        }

        let query_vector = self
            .embedder
            .embed(&[query.to_string()])
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?
            .into_iter()
            .next()
            .and_then(normalize)
            .ok_or_else(|| RetrievalError::Embedding("empty query embedding".to_string()))?;

        let items = self
            .documents
            .iter()
            .filter_map(|doc| {
                let vector = doc.vector.as_ref()?;
                if vector.len() != query_vector.len() {
                    return None;
                }
                Some(RetrievedItem::new(
                    doc.document.id.clone(),
                    dot(vector, &query_vector),
                    RetrievalSource::Semantic,
                    doc.document.text.clone(),
                ))
            })
            .collect();

        let ranked = top_k(items, k);
        debug!(hits = ranked.len(), "Vector search complete");
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gnsearch_application::EmbeddingError;
    use std::collections::HashMap;

    /// Maps known texts to fixed vectors
    struct TableEmbedder(HashMap<&'static str, Vec<f32>>);

    #[async_trait]
    impl Embedder for TableEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            texts
                .iter()
                .map(|t| {
                    self.0
                        .get(t.as_str())
                        .cloned()
                        .ok_or_else(|| EmbeddingError::RequestFailed(format!("unknown: {}", t)))
                })
                .collect()
        }
    }

    fn embedder() -> Arc<dyn Embedder> {
        Arc::new(TableEmbedder(HashMap::from([
            ("mouse strains", vec![1.0, 0.0, 0.0]),
            ("brain tissue", vec![0.0, 1.0, 0.0]),
            ("mixed", vec![1.0, 1.0, 0.0]),
            ("blank", vec![0.0, 0.0, 0.0]),
            ("corrupt", vec![f32::NAN, 1.0, 0.0]),
            ("overflow", vec![f32::INFINITY, 0.0, 0.0]),
            ("which strains?", vec![2.0, 0.1, 0.0]),
        ])))
    }

    async fn index(texts: &[&str]) -> VectorIndex {
        let docs = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Document::new(format!("Document {}", i + 1), *t))
            .collect();
        VectorIndex::build(docs, embedder()).await.unwrap()
    }

    #[tokio::test]
    async fn test_ranks_by_cosine_similarity() {
        let index = index(&["brain tissue", "mouse strains", "mixed"]).await;
        let results = index.search("which strains?", 2).await.unwrap();

        let ids: Vec<&str> = results.iter().map(|i| i.document_id.as_str()).collect();
        assert_eq!(ids, vec!["Document 2", "Document 3"]);
        assert!(results.items()[0].score <= 1.0 + 1e-9);
        assert_eq!(results.items()[0].source, RetrievalSource::Semantic);
    }

    #[tokio::test]
    async fn test_zero_vectors_are_skipped() {
        let index = index(&["blank", "mouse strains"]).await;
        let results = index.search("which strains?", 10).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_non_finite_vectors_are_skipped() {
        let index = index(&["corrupt", "mouse strains", "overflow"]).await;
        let results = index.search("which strains?", 10).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results.items()[0].document_id.as_str(), "Document 2");
        assert!(results.items()[0].score.is_finite());
    }

    #[tokio::test]
    async fn test_non_finite_query_is_an_embedding_error() {
        let index = index(&["mouse strains"]).await;
        let err = index.search("corrupt", 3).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_embedding_failure_is_reported() {
        let index = index(&["mouse strains"]).await;
        let err = index.search("never seen", 3).await.unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_build_fails_when_embedder_fails() {
        let docs = vec![Document::new("Document 1", "unknown text")];
        let result = VectorIndex::build(docs, embedder()).await;
        assert!(matches!(result, Err(RetrievalError::Embedding(_))));
    }
}
