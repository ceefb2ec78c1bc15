//! Report Routes

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::AppState;

/// Plain-text report of the latest assessment per category
pub async fn get_report(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state.read().await;
    let latest = state.repository.latest_per_category()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        storage::render_report(&latest),
    ))
}

/// JSON report of the latest assessment per category
pub async fn get_json_report(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state.read().await;
    let latest = state.repository.latest_per_category()?;
    let body = storage::render_json_report(&latest)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}
