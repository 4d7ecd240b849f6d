//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Query too long: {length} characters (maximum {max})")]
    QueryTooLong { length: usize, max: usize },

    #[error("Invalid fusion weight: {0}")]
    InvalidWeight(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Check if this error came from boundary input validation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyQuery | DomainError::QueryTooLong { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::EmptyQuery.is_cancelled());
    }

    #[test]
    fn test_query_too_long_display() {
        let error = DomainError::QueryTooLong {
            length: 1200,
            max: 1000,
        };
        assert_eq!(
            error.to_string(),
            "Query too long: 1200 characters (maximum 1000)"
        );
        assert!(error.is_validation());
    }
}
