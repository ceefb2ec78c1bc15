//! Category and Model Routes

use axum::{extract::State, Json};
use feature_schema::{schema, Category, FieldSpec};
use health_rules::rule_set;
use model_runtime::ModelStatus;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::AppState;

/// Category description for form rendering
#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub category: Category,
    pub name: &'static str,
    pub feature_count: usize,
    pub default_score: u8,
    pub fields: &'static [FieldSpec],
}

/// Load state of one category's model
#[derive(Debug, Serialize)]
pub struct ModelEntry {
    pub category: Category,
    #[serde(flatten)]
    pub status: ModelStatus,
}

/// List categories with their field schemas
pub async fn get_categories() -> Json<Vec<CategoryInfo>> {
    Json(
        Category::ALL
            .iter()
            .map(|category| CategoryInfo {
                category: *category,
                name: category.display_name(),
                feature_count: category.feature_count(),
                default_score: rule_set(*category).default_score,
                fields: schema(*category),
            })
            .collect(),
    )
}

/// Model load state per category
pub async fn get_models(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<ModelEntry>>, ApiError> {
    let state = state.read().await;
    let status = state
        .service
        .registry()
        .status()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(
        status
            .into_iter()
            .map(|(category, status)| ModelEntry { category, status })
            .collect(),
    ))
}

/// Clear the model cache so artifacts are probed again
pub async fn reload_models(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<ModelEntry>>, ApiError> {
    {
        let state = state.read().await;
        state
            .service
            .registry()
            .reload()
            .map_err(|e| ApiError::ModelUnavailable(e.to_string()))?;
    }
    get_models(State(state)).await
}
