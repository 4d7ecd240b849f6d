//! Query value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default maximum query length in characters.
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 1000;

/// A natural-language question accepted at the system boundary (Value Object).
///
/// Construction trims surrounding whitespace and enforces the
/// non-empty and maximum-length rules; a `Query` that exists is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    content: String,
}

impl Query {
    /// Validate and create a query.
    ///
    /// Length is measured in characters, not bytes.
    pub fn parse(content: impl AsRef<str>, max_length: usize) -> Result<Self, DomainError> {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyQuery);
        }
        let length = trimmed.chars().count();
        if length > max_length {
            return Err(DomainError::QueryTooLong {
                length,
                max: max_length,
            });
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the query content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims() {
        let q = Query::parse("  Which traits map to Chr 1?  ", 100).unwrap();
        assert_eq!(q.content(), "Which traits map to Chr 1?");
    }

    #[test]
    fn test_empty_query_rejected() {
        assert_eq!(Query::parse("", 100), Err(DomainError::EmptyQuery));
        assert_eq!(Query::parse("   ", 100), Err(DomainError::EmptyQuery));
    }

    #[test]
    fn test_too_long_rejected() {
        let long = "a".repeat(1001);
        let err = Query::parse(&long, DEFAULT_MAX_QUERY_LENGTH).unwrap_err();
        assert!(matches!(err, DomainError::QueryTooLong { length: 1001, max: 1000 }));
    }

    #[test]
    fn test_length_counts_characters() {
        // 4 characters, 12 bytes
        assert!(Query::parse("遺伝子型", 4).is_ok());
        assert!(Query::parse("遺伝子型!", 4).is_err());
    }
}
