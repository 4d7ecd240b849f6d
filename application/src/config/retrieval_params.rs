//! Retrieval depth and fusion weights

use gnsearch_domain::{FusionWeight, SearchKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalParams {
    /// Results requested from the lexical retriever
    pub lexical_k: usize,
    /// Results requested from the semantic retriever
    pub semantic_k: usize,
    /// Results kept after fusion
    pub top_k: usize,
    /// Weights for semantically routed queries
    pub default_weights: FusionWeight,
    /// Weights for keyword-routed queries
    pub keyword_weights: FusionWeight,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            lexical_k: 20,
            semantic_k: 20,
            top_k: 10,
            default_weights: SearchKind::Semantic.weights(),
            keyword_weights: SearchKind::Keyword.weights(),
        }
    }
}

impl RetrievalParams {
    pub fn weights_for(&self, kind: SearchKind) -> FusionWeight {
        match kind {
            SearchKind::Keyword => self.keyword_weights,
            SearchKind::Semantic => self.default_weights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_for() {
        let params = RetrievalParams::default();
        assert_eq!(params.weights_for(SearchKind::Keyword).lexical(), 0.7);
        assert_eq!(params.weights_for(SearchKind::Semantic).lexical(), 0.5);
    }
}
