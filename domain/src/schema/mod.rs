//! RDF schema vocabulary and structured-query handling
//!
//! The vocabulary (namespace prefixes and predicate names) is read from
//! Turtle files and handed to the model so it can write SPARQL against the
//! real schema. The model's output is checked here before it reaches the
//! endpoint.

pub mod namespaces;
pub mod translation;
pub mod vocabulary;

pub use namespaces::{NAMESPACES, expand_prefixed};
pub use translation::{SchemaError, extract_structured_query};
pub use vocabulary::SchemaVocabulary;
