//! Storage Layer
//!
//! Keeps the caller-owned history of assessments and renders reports of the
//! latest result per category.

mod report;
mod repository;

pub use report::{render_json_report, render_report};
pub use repository::{AssessmentRecord, ModelSummary, Repository};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage lock error: {0}")]
    LockError(String),
    #[error("Record not found")]
    NotFound,
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
