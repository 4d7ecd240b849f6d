//! Agent and retrieval configuration (`[agent]` and `[retrieval]` sections)

use serde::{Deserialize, Serialize};

/// Supervisor and reason/act bounds
///
/// # Example
///
/// ```toml
/// [agent]
/// loop_budget = 20        # THINK/ACT cycles per expert run
/// max_transitions = 40    # global step cap
/// max_follow_ups = 1
/// max_query_length = 1000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub loop_budget: usize,
    pub max_transitions: usize,
    /// Follow-up research rounds after the plan is exhausted
    pub max_follow_ups: usize,
    /// Longest accepted query, in characters
    pub max_query_length: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            loop_budget: 20,
            max_transitions: 40,
            max_follow_ups: 1,
            max_query_length: 1000,
        }
    }
}

/// Retrieval depth and fusion weights
///
/// Weights are the lexical share in `[0, 1]`; the semantic share is the
/// remainder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    pub lexical_k: usize,
    pub semantic_k: usize,
    pub top_k: usize,
    pub default_lexical_weight: f64,
    pub keyword_lexical_weight: f64,
    pub timeout_seconds: u64,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            lexical_k: 20,
            semantic_k: 20,
            top_k: 10,
            default_lexical_weight: 0.5,
            keyword_lexical_weight: 0.7,
            timeout_seconds: 30,
        }
    }
}
