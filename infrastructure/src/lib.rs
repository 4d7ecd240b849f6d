//! Infrastructure layer for gnsearch
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: model endpoints, retrieval indexes, the corpus
//! cache, schema files, expert tools, conversation logs, and configuration
//! file loading.

pub mod config;
pub mod corpus;
pub mod logging;
pub mod providers;
pub mod retrieval;
pub mod schema;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use corpus::{CorpusCache, CorpusError};
pub use logging::JsonlConversationLogger;
pub use providers::{OpenAiEmbedder, OpenAiGateway};
pub use retrieval::{Bm25Index, VectorIndex};
pub use schema::TtlSchemaSource;
pub use tools::{NcbiToolProvider, SparqlToolProvider, ToolRegistry};
