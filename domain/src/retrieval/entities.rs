//! Retrieval domain entities

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Opaque document identifier (e.g. `"Document 42"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for DocumentId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An indexed document. Immutable once indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Which retriever produced an item.
///
/// The declaration order is the tie-break priority: lexical before semantic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalSource {
    Lexical,
    Semantic,
}

impl RetrievalSource {
    pub fn as_str(&self) -> &str {
        match self {
            RetrievalSource::Lexical => "lexical",
            RetrievalSource::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for RetrievalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scored hit for one query. Lives only for that query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedItem {
    pub document_id: DocumentId,
    pub score: f64,
    pub source: RetrievalSource,
    /// Document text, carried so consumers do not need a second lookup.
    pub text: String,
}

impl RetrievedItem {
    pub fn new(
        document_id: impl Into<DocumentId>,
        score: f64,
        source: RetrievalSource,
        text: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            score,
            source,
            text: text.into(),
        }
    }
}

/// Ordered result of a single retriever (or of fusion).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedList {
    items: Vec<RetrievedItem>,
}

impl RankedList {
    /// Build a ranked list, ordering by score descending with ties broken
    /// by source priority and then document id ascending.
    pub fn new(mut items: Vec<RetrievedItem>) -> Self {
        items.sort_by(compare_items);
        Self { items }
    }

    /// Build from items already in their final order.
    pub(crate) fn from_ordered(items: Vec<RetrievedItem>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[RetrievedItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<RetrievedItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RetrievedItem> {
        self.items.iter()
    }

    /// Rank (0-based) of a document, if present.
    pub fn rank_of(&self, id: &DocumentId) -> Option<usize> {
        self.items.iter().position(|item| &item.document_id == id)
    }
}

/// Sort key for a score. Non-finite scores rank below every finite one.
pub(crate) fn rank_score(score: f64) -> f64 {
    if score.is_finite() { score } else { f64::NEG_INFINITY }
}

fn compare_items(a: &RetrievedItem, b: &RetrievedItem) -> Ordering {
    rank_score(b.score)
        .total_cmp(&rank_score(a.score))
        .then_with(|| a.source.cmp(&b.source))
        .then_with(|| a.document_id.cmp(&b.document_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_scores_sink_below_finite_ones() {
        let items = (0..64)
            .map(|i| {
                let score = if i % 5 == 0 { f64::NAN } else { (i * 37 % 64) as f64 };
                RetrievedItem::new(format!("Document {}", i), score, RetrievalSource::Lexical, "")
            })
            .collect();

        let list = RankedList::new(items);

        let scores: Vec<f64> = list.iter().map(|i| i.score).collect();
        let finite: Vec<f64> = scores.iter().copied().take_while(|s| s.is_finite()).collect();
        assert_eq!(finite.len(), 51);
        assert!(finite.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores[51..].iter().all(|s| s.is_nan()));
    }

    #[test]
    fn test_ranked_list_orders_by_score() {
        let list = RankedList::new(vec![
            RetrievedItem::new("a", 0.2, RetrievalSource::Lexical, ""),
            RetrievedItem::new("b", 0.9, RetrievalSource::Lexical, ""),
            RetrievedItem::new("c", 0.5, RetrievalSource::Lexical, ""),
        ]);
        let ids: Vec<_> = list.iter().map(|i| i.document_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(list.rank_of(&DocumentId::new("c")), Some(1));
    }

    #[test]
    fn test_ranked_list_tie_break() {
        let list = RankedList::new(vec![
            RetrievedItem::new("z", 0.5, RetrievalSource::Semantic, ""),
            RetrievedItem::new("y", 0.5, RetrievalSource::Lexical, ""),
            RetrievedItem::new("x", 0.5, RetrievalSource::Semantic, ""),
        ]);
        let ids: Vec<_> = list.iter().map(|i| i.document_id.as_str()).collect();
        // lexical first, then ids ascending
        assert_eq!(ids, vec!["y", "x", "z"]);
    }
}
