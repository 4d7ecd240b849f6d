//! Schema source port
//!
//! Supplies the raw Turtle text the RDF vocabulary is extracted from.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaSourceError {
    #[error("Schema source not found: {0}")]
    NotFound(String),

    #[error("Failed to read schema source {path}: {message}")]
    Read { path: String, message: String },
}

pub trait SchemaSource: Send + Sync {
    /// Human-readable origin for logs
    fn describe(&self) -> String;

    /// Contents of every schema file
    fn load(&self) -> Result<Vec<String>, SchemaSourceError>;
}
