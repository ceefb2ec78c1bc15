//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use feature_schema::{SchemaError, ValidationError};
use health_rules::RuleError;
use serde_json::json;
use storage::StorageError;
use thiserror::Error;

/// Errors surfaced by handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown assessment category: {0}")]
    UnknownCategory(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Input validation failed")]
    ValidationFailed(Vec<ValidationError>),
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::ValidationFailed(_) => "VALIDATION_FAILED",
            ApiError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownCategory(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) | ApiError::ValidationFailed(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::UnknownCategory(token) => ApiError::UnknownCategory(token),
            other => ApiError::InvalidInput(other.to_string()),
        }
    }
}

impl From<RuleError> for ApiError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::InvalidCategory(token) => ApiError::UnknownCategory(token),
            other => ApiError::InvalidInput(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::ValidationFailed(errors) => json!({
                "error": self.error_code(),
                "message": self.to_string(),
                "details": { "errors": errors },
            }),
            _ => json!({
                "error": self.error_code(),
                "message": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
