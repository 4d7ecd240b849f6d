//! Okapi BM25 lexical index

use super::{tokenize, top_k};
use async_trait::async_trait;
use gnsearch_application::{RetrievalError, Retriever};
use gnsearch_domain::{Document, RankedList, RetrievalSource, RetrievedItem};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation
    pub k1: f64,
    /// Length normalisation
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

struct IndexedDocument {
    document: Document,
    term_freqs: HashMap<String, u32>,
    length: usize,
}

/// Okapi BM25 over lowercase alphanumeric tokens.
///
/// Uses the non-negative idf `ln(1 + (N - n + 0.5) / (n + 0.5))`. Documents
/// sharing no term with the query are left out of the results.
pub struct Bm25Index {
    documents: Vec<IndexedDocument>,
    doc_freqs: HashMap<String, usize>,
    avg_length: f64,
    params: Bm25Params,
}

impl Bm25Index {
    pub fn new(documents: Vec<Document>) -> Self {
        Self::with_params(documents, Bm25Params::default())
    }

    pub fn with_params(documents: Vec<Document>, params: Bm25Params) -> Self {
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();
        let mut total_length = 0usize;

        let documents: Vec<IndexedDocument> = documents
            .into_iter()
            .map(|document| {
                let tokens = tokenize(&document.text);
                let mut term_freqs: HashMap<String, u32> = HashMap::new();
                for token in &tokens {
                    *term_freqs.entry(token.clone()).or_insert(0) += 1;
                }
                for term in term_freqs.keys() {
                    *doc_freqs.entry(term.clone()).or_insert(0) += 1;
                }
                total_length += tokens.len();
                IndexedDocument {
                    document,
                    term_freqs,
                    length: tokens.len(),
                }
            })
            .collect();

        let avg_length = if documents.is_empty() {
            0.0
        } else {
            total_length as f64 / documents.len() as f64
        };

        debug!(
            documents = documents.len(),
            terms = doc_freqs.len(),
            "Built BM25 index"
        );

        Self {
            documents,
            doc_freqs,
            avg_length,
            params,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn idf(&self, term: &str) -> f64 {
        let n = self.documents.len() as f64;
        let df = self.doc_freqs.get(term).copied().unwrap_or(0) as f64;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Scores of every document sharing at least one term with `query`
    pub fn score(&self, query: &str) -> Vec<(usize, f64)> {
        let mut terms = tokenize(query);
        terms.sort();
        terms.dedup();
        terms.retain(|t| self.doc_freqs.contains_key(t));
        if terms.is_empty() {
            return Vec::new();
        }

        let idfs: Vec<(String, f64)> = terms
            .into_iter()
            .map(|t| {
                let idf = self.idf(&t);
                (t, idf)
            })
            .collect();

        let Bm25Params { k1, b } = self.params;
        self.documents
            .iter()
            .enumerate()
            .filter_map(|(i, doc)| {
                let mut score = 0.0;
                let mut matched = false;
                for (term, idf) in &idfs {
                    let Some(&tf) = doc.term_freqs.get(term) else {
                        continue;
                    };
                    matched = true;
                    let tf = tf as f64;
                    let norm = 1.0 - b + b * doc.length as f64 / self.avg_length.max(f64::EPSILON);
                    score += idf * tf * (k1 + 1.0) / (tf + k1 * norm);
                }
                matched.then_some((i, score))
            })
            .collect()
    }
}

#[async_trait]
impl Retriever for Bm25Index {
    fn source(&self) -> RetrievalSource {
        RetrievalSource::Lexical
    }

    async fn search(&self, query: &str, k: usize) -> Result<RankedList, RetrievalError> {
        let items = self
            .score(query)
            .into_iter()
            .map(|(i, score)| {
                let doc = &self.documents[i].document;
                RetrievedItem::new(
                    doc.id.clone(),
                    score,
                    RetrievalSource::Lexical,
                    doc.text.clone(),
                )
            })
            .collect();
        Ok(top_k(items, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> Bm25Index {
        Bm25Index::new(vec![
            Document::new("Document 1", "BXD mice are recombinant inbred strains"),
            Document::new("Document 2", "hippocampus expression data for BXD BXD"),
            Document::new("Document 3", "adipose tissue in rats"),
        ])
    }

    #[tokio::test]
    async fn test_zero_overlap_documents_are_omitted() {
        let results = index().search("bxd hippocampus", 10).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|i| i.document_id.as_str()).collect();
        assert_eq!(ids, vec!["Document 2", "Document 1"]);
        assert!(results.iter().all(|i| i.source == RetrievalSource::Lexical));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let results = index().search("ADIPOSE", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.items()[0].document_id.as_str(), "Document 3");
    }

    #[tokio::test]
    async fn test_k_limits_results() {
        let results = index().search("bxd", 1).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_terms_give_empty_list() {
        assert!(index().search("zebrafish", 5).await.unwrap().is_empty());
        assert!(Bm25Index::new(Vec::new()).search("bxd", 5).await.unwrap().is_empty());
    }

    #[test]
    fn test_rarer_terms_weigh_more() {
        let index = index();
        assert!(index.idf("hippocampus") > index.idf("bxd"));
        assert!(index.idf("bxd") > 0.0);
    }

    #[test]
    fn test_repeated_terms_saturate() {
        let index = Bm25Index::new(vec![
            Document::new("Document 1", "gene"),
            Document::new("Document 2", "gene gene gene gene gene gene gene gene"),
            Document::new("Document 3", "other"),
        ]);
        let scores: HashMap<usize, f64> = index.score("gene").into_iter().collect();
        let ratio = scores[&1] / scores[&0];
        assert!(ratio < 2.5, "saturation expected, got ratio {}", ratio);
    }
}
