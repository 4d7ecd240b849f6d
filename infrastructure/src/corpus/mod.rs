//! Processed-corpus cache
//!
//! The raw corpus is a JSON object mapping each RDF subject to its list of
//! predicate/object strings. Every subject becomes one document:
//!
//! ```text
//! {"gn:BXD": ["a mouse strain", "rdfs:label \"BXD\""]}
//!   → "gn:BXD is/has a mouse strain. gn:BXD is/has rdfs:label \"BXD\". "
//! ```
//!
//! The processed texts are written once to `pcorpus_path` as a JSON array
//! and reused verbatim afterwards; the cache is never checked against the
//! raw corpus for staleness. Delete the processed file to rebuild it.

use gnsearch_domain::Document;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Corpus not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected corpus layout in {}: {message}", path.display())]
    Layout { path: PathBuf, message: String },
}

/// Indexed documents, loaded from the processed cache or built from the raw
/// corpus.
#[derive(Debug, Clone)]
pub struct CorpusCache {
    documents: Vec<Document>,
}

impl CorpusCache {
    /// Load `pcorpus_path` if it exists, otherwise build it from
    /// `corpus_path` and write it.
    pub fn load_or_build(corpus_path: &Path, pcorpus_path: &Path) -> Result<Self, CorpusError> {
        let texts = if pcorpus_path.exists() {
            let texts = read_processed(pcorpus_path)?;
            info!(
                path = %pcorpus_path.display(),
                documents = texts.len(),
                "Loaded processed corpus"
            );
            texts
        } else {
            let texts = build_from_raw(corpus_path)?;
            write_processed(pcorpus_path, &texts)?;
            info!(
                corpus = %corpus_path.display(),
                cache = %pcorpus_path.display(),
                documents = texts.len(),
                "Built processed corpus"
            );
            texts
        };

        Ok(Self::from_texts(texts))
    }

    /// Assign `Document {n}` ids (1-based, corpus order).
    pub fn from_texts(texts: Vec<String>) -> Self {
        let documents = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Document::new(format!("Document {}", i + 1), text))
            .collect();
        Self { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn read_processed(path: &Path) -> Result<Vec<String>, CorpusError> {
    let raw = fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CorpusError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn build_from_raw(path: &Path) -> Result<Vec<String>, CorpusError> {
    if !path.exists() {
        return Err(CorpusError::NotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let collection: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| CorpusError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let serde_json::Value::Object(subjects) = collection else {
        return Err(CorpusError::Layout {
            path: path.to_path_buf(),
            message: "top level must be an object keyed by subject".to_string(),
        });
    };

    Ok(subjects
        .iter()
        .map(|(subject, values)| subject_text(subject, values))
        .collect())
}

fn subject_text(subject: &str, values: &serde_json::Value) -> String {
    let values: Vec<&serde_json::Value> = match values {
        serde_json::Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    values
        .into_iter()
        .map(|value| match value {
            serde_json::Value::String(s) => format!("{} is/has {}. ", subject, s),
            other => format!("{} is/has {}. ", subject, other),
        })
        .collect()
}

fn write_processed(path: &Path, texts: &[String]) -> Result<(), CorpusError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(source) = fs::create_dir_all(parent)
    {
        return Err(CorpusError::Io {
            path: parent.to_path_buf(),
            source,
        });
    }

    let json = serde_json::to_string(texts).map_err(|source| CorpusError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| {
        warn!(path = %path.display(), "Could not write processed corpus");
        CorpusError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"{
        "gn:BXD": ["a recombinant inbred strain", "bred at UTHSC"],
        "gn:Hippocampus": ["a brain region"],
        "gn:Adipose": "fat tissue"
    }"#;

    #[test]
    fn test_builds_documents_in_corpus_order() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("corpus.json");
        let processed = dir.path().join("cache").join("pcorpus.json");
        fs::write(&raw, RAW).unwrap();

        let cache = CorpusCache::load_or_build(&raw, &processed).unwrap();

        assert_eq!(cache.len(), 3);
        let first = &cache.documents()[0];
        assert_eq!(first.id.as_str(), "Document 1");
        assert_eq!(
            first.text,
            "gn:BXD is/has a recombinant inbred strain. gn:BXD is/has bred at UTHSC. "
        );
        assert_eq!(cache.documents()[1].text, "gn:Hippocampus is/has a brain region. ");
        assert_eq!(cache.documents()[2].text, "gn:Adipose is/has fat tissue. ");
        assert!(processed.exists());
    }

    #[test]
    fn test_processed_cache_is_used_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("corpus.json");
        let processed = dir.path().join("pcorpus.json");
        fs::write(&raw, RAW).unwrap();
        fs::write(&processed, r#"["cached one", "cached two"]"#).unwrap();

        let cache = CorpusCache::load_or_build(&raw, &processed).unwrap();

        let texts: Vec<&str> = cache.documents().iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["cached one", "cached two"]);
        assert_eq!(cache.documents()[1].id.as_str(), "Document 2");
    }

    #[test]
    fn test_second_load_reads_what_the_first_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("corpus.json");
        let processed = dir.path().join("pcorpus.json");
        fs::write(&raw, RAW).unwrap();

        let built = CorpusCache::load_or_build(&raw, &processed).unwrap();
        fs::remove_file(&raw).unwrap();
        let loaded = CorpusCache::load_or_build(&raw, &processed).unwrap();

        assert_eq!(built.documents(), loaded.documents());
    }

    #[test]
    fn test_missing_raw_corpus_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CorpusCache::load_or_build(
            &dir.path().join("absent.json"),
            &dir.path().join("pcorpus.json"),
        )
        .unwrap_err();
        assert!(matches!(err, CorpusError::NotFound(_)));
    }

    #[test]
    fn test_non_object_corpus_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("corpus.json");
        fs::write(&raw, "[1, 2, 3]").unwrap();

        let err = CorpusCache::load_or_build(&raw, &dir.path().join("p.json")).unwrap_err();
        assert!(matches!(err, CorpusError::Layout { .. }));
    }
}
