//! Schema and Validation Error Types

use serde::Serialize;
use thiserror::Error;

/// Errors while interpreting a category token or assembling a feature vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Category token not recognized
    #[error("Unknown assessment category: {0}")]
    UnknownCategory(String),

    /// Positional vector has the wrong number of values
    #[error("{category} expects {expected} features, got {actual}")]
    FeatureCount {
        category: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Named field not part of the category schema
    #[error("Unknown field '{field}' for {category}")]
    UnknownField {
        category: &'static str,
        field: String,
    },
}

/// Errors during entry-bound validation
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinite value
    #[error("{field} value is not a finite number")]
    NonFinite { field: &'static str },
}
