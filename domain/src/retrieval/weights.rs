//! Fusion weights value object

use super::entities::RetrievalSource;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Relative weight of lexical vs semantic evidence during fusion.
///
/// Only the lexical share is stored; the semantic share is always
/// `1 - lexical`, so the two sum to one by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FusionWeight {
    lexical: f64,
}

impl FusionWeight {
    /// Lexical share used for semantic (default) queries.
    pub const BALANCED_LEXICAL: f64 = 0.5;
    /// Lexical share used for keyword-routed queries.
    pub const KEYWORD_LEXICAL: f64 = 0.7;

    /// Create weights from a lexical share in `[0, 1]`.
    pub fn new(lexical: f64) -> Result<Self, DomainError> {
        if !lexical.is_finite() || !(0.0..=1.0).contains(&lexical) {
            return Err(DomainError::InvalidWeight(format!(
                "lexical weight must be within [0, 1], got {}",
                lexical
            )));
        }
        Ok(Self { lexical })
    }

    /// 0.5 / 0.5
    pub fn balanced() -> Self {
        Self {
            lexical: Self::BALANCED_LEXICAL,
        }
    }

    /// 0.7 / 0.3
    pub fn keyword() -> Self {
        Self {
            lexical: Self::KEYWORD_LEXICAL,
        }
    }

    pub fn lexical(&self) -> f64 {
        self.lexical
    }

    pub fn semantic(&self) -> f64 {
        1.0 - self.lexical
    }

    pub fn weight_for(&self, source: RetrievalSource) -> f64 {
        match source {
            RetrievalSource::Lexical => self.lexical(),
            RetrievalSource::Semantic => self.semantic(),
        }
    }
}

impl Default for FusionWeight {
    fn default() -> Self {
        Self::balanced()
    }
}

impl TryFrom<f64> for FusionWeight {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FusionWeight> for f64 {
    fn from(weight: FusionWeight) -> Self {
        weight.lexical
    }
}
