//! Assessment Routes

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use feature_schema::{Category, FeatureVector, Profile, Validator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::service::AssessmentOutcome;
use crate::AppState;
use storage::{AssessmentRecord, StorageError};

/// Body of an assessment request: positional `features` or named `fields`
#[derive(Debug, Default, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub features: Option<Vec<f64>>,
    #[serde(default)]
    pub fields: BTreeMap<String, f64>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl AssessmentRequest {
    /// Build the feature vector for a category
    pub fn into_vector(self, category: Category) -> Result<FeatureVector, ApiError> {
        match self.features {
            Some(_) if !self.fields.is_empty() => Err(ApiError::InvalidInput(
                "supply either positional features or named fields, not both".to_string(),
            )),
            Some(values) => Ok(FeatureVector::new(category, values)?),
            None => Ok(FeatureVector::from_named(category, &self.fields, self.profile.as_ref())?),
        }
    }
}

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Filter by category
    pub category: Option<String>,
    /// Maximum number of records
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for the history endpoint
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<AssessmentRecord>,
    pub count: usize,
}

/// Response for clearing history
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub removed: usize,
}

/// Validate, assess, and record
pub async fn create_assessment(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(category): Path<String>,
    body: Result<Json<AssessmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AssessmentOutcome>), ApiError> {
    let category: Category = category.parse()?;
    let Json(request) = body.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let vector = request.into_vector(category)?;

    let validation = Validator::new().validate(&vector);
    if !validation.valid {
        return Err(ApiError::ValidationFailed(validation.errors));
    }

    let service = state.read().await.service.clone();
    let (mut outcome, vector) =
        tokio::task::spawn_blocking(move || service.assess(&vector).map(|o| (o, vector)))
            .await
            .map_err(|e| ApiError::Internal(format!("assessment task failed: {}", e)))??;

    let state = state.read().await;
    let id = state.repository.insert(outcome.to_record(&vector))?;
    outcome.id = Some(id);

    info!(
        "Recorded {} assessment {} (risk={}, score={})",
        category, id, outcome.result.risk_flag, outcome.result.score
    );
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// List history, newest first
pub async fn list_assessments(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let category = params
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;
    list(state, category, params.limit).await
}

/// List history of one category
pub async fn list_category(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(category): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let category: Category = category.parse()?;
    list(state, Some(category), params.limit).await
}

async fn list(
    state: Arc<RwLock<AppState>>,
    category: Option<Category>,
    limit: usize,
) -> Result<Json<HistoryResponse>, ApiError> {
    let state = state.read().await;
    let data = state.repository.list(category, limit.min(500))?;

    Ok(Json(HistoryResponse {
        count: data.len(),
        data,
    }))
}

/// Fetch one record
pub async fn get_record(
    State(state): State<Arc<RwLock<AppState>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssessmentRecord>, ApiError> {
    let state = state.read().await;
    match state.repository.get(id) {
        Ok(record) => Ok(Json(record)),
        Err(StorageError::NotFound) => Err(ApiError::NotFound(format!("assessment {}", id))),
        Err(e) => Err(e.into()),
    }
}

/// Drop all history
pub async fn clear_assessments(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Json<ClearResponse>, ApiError> {
    let state = state.read().await;
    let removed = state.repository.clear()?;
    Ok(Json(ClearResponse { removed }))
}
