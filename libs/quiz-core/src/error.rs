//! Error types for quiz-core.

use thiserror::Error;

/// Result type alias using CatalogError.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while loading a content catalog.
///
/// Matching and assembly never error on learner input; only load-time
/// validation is fallible.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unit number must be positive")]
    InvalidUnitNumber,

    #[error("duplicate unit number {number}")]
    DuplicateUnit { number: u32 },

    #[error("empty {field} in unit {unit}")]
    EmptyField { unit: u32, field: &'static str },
}
