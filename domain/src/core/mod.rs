//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: a validated natural-language question
//! - [`error::DomainError`]: domain-level errors
//! - [`output_format::OutputFormat`]: how answers are rendered

pub mod error;
pub mod output_format;
pub mod query;
pub mod string;
