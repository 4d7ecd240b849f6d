//! Data locations (`[corpus]` and `[schema]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// RDF corpus and its processed cache
///
/// ```toml
/// [corpus]
/// corpus_path = "data/corpus.json"
/// pcorpus_path = "data/pcorpus.json"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCorpusConfig {
    /// Raw corpus: JSON object of subject -> values
    pub corpus_path: PathBuf,
    /// Processed documents, written on first build
    pub pcorpus_path: PathBuf,
}

impl Default for FileCorpusConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("data/corpus.json"),
            pcorpus_path: PathBuf::from("data/pcorpus.json"),
        }
    }
}

/// Turtle schema files for query translation
///
/// `ttl_path` is either a single `.ttl` file or a directory searched
/// recursively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSchemaConfig {
    pub ttl_path: PathBuf,
}

impl Default for FileSchemaConfig {
    fn default() -> Self {
        Self {
            ttl_path: PathBuf::from("data/schema"),
        }
    }
}
