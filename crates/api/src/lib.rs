//! Health Assessment API Server
//!
//! REST API for the health assessment dashboard: category schemas, rule and
//! model based assessments, history, and reports.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use feature_schema::Category;
use model_runtime::{ModelLocator, ModelRegistry, ModelStatus};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};

pub mod config;
pub mod error;
mod routes;
pub mod service;

use crate::config::{AppConfig, LoggingConfig};
use crate::service::{AssessmentService, ScoringPolicy};
use storage::Repository;

/// Application state shared across handlers
pub struct AppState {
    /// Rule engine plus model registry
    pub service: Arc<AssessmentService>,
    /// Assessment history
    pub repository: Repository,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: &AppConfig) -> Self {
        let locator = ModelLocator::new(config.models.search_dirs.iter().map(String::as_str));
        Self {
            service: Arc::new(AssessmentService::new(
                ModelRegistry::new(locator),
                config.models.policy,
            )),
            repository: Repository::new(config.history.max_records),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub policy: ScoringPolicy,
    pub models_loaded: usize,
    pub assessment_count: usize,
}

/// Create the application router
pub fn create_router(state: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/categories", get(routes::catalog::get_categories))
        .route("/api/v1/models", get(routes::catalog::get_models))
        .route("/api/v1/models/reload", post(routes::catalog::reload_models))
        .route(
            "/api/v1/assessments",
            get(routes::assessments::list_assessments)
                .delete(routes::assessments::clear_assessments),
        )
        .route(
            "/api/v1/assessments/:category",
            post(routes::assessments::create_assessment).get(routes::assessments::list_category),
        )
        .route("/api/v1/records/:id", get(routes::assessments::get_record))
        .route("/api/v1/report", get(routes::report::get_report))
        .route("/api/v1/report.json", get(routes::report::get_json_report))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let models_loaded = state.service.registry().status().map(|status| {
        status
            .iter()
            .filter(|(_, status)| matches!(status, ModelStatus::Loaded { .. }))
            .count()
    });
    let assessment_count = state.repository.count();

    let (code, status, models_loaded, assessment_count) = match (models_loaded, assessment_count) {
        (Ok(models), Ok(count)) => (StatusCode::OK, "healthy", models, count),
        (models, count) => {
            warn!(
                "Health check degraded: models={:?}, history={:?}",
                models.as_ref().err(),
                count.as_ref().err()
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "degraded",
                models.unwrap_or(0),
                count.unwrap_or(0),
            )
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            timestamp,
            version: state.version.clone(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            policy: state.service.policy(),
            models_loaded,
            assessment_count,
        }),
    )
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the server
pub async fn run_server(
    config: AppConfig,
    metrics: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    let mut state = AppState::new(&config);
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }

    if config.models.policy != ScoringPolicy::RulesOnly {
        let service = state.service.clone();
        let loaded = tokio::task::spawn_blocking(move || service.registry().preload()).await?;
        info!("Loaded {} of {} models", loaded, Category::ALL.len());
    }

    let app = create_router(Arc::new(RwLock::new(state)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    info!(
        "Starting API server on {} (policy={:?})",
        config.server.bind_addr, config.models.policy
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use std::fs;
    use tower::ServiceExt;

    fn app_with(dir: &std::path::Path, policy: ScoringPolicy) -> Router {
        let mut config = AppConfig::default();
        config.models.search_dirs = vec![dir.to_string_lossy().into_owned()];
        config.models.policy = policy;
        create_router(Arc::new(RwLock::new(AppState::new(&config))))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), ScoringPolicy::ModelThenRules);

        let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["policy"], "model_then_rules");
        assert_eq!(body["assessment_count"], 0);
    }

    #[tokio::test]
    async fn test_categories() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), ScoringPolicy::RulesOnly);

        let (status, body) = send(&app, Method::GET, "/api/v1/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 4);
        assert_eq!(body[0]["category"], "heart");
        assert_eq!(body[0]["feature_count"], 13);
        assert_eq!(body[2]["default_score"], 90);
    }

    #[tokio::test]
    async fn test_positional_assessment_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), ScoringPolicy::ModelThenRules);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/assessments/heart",
            Some(json!({ "features": [60, 1, 0, 150, 250, 1, 0, 100, 0, 1.0, 0, 0, 2] })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["result"]["risk_flag"], true);
        assert_eq!(body["result"]["score"], 60);
        assert_eq!(body["result"]["recommendations"].as_array().unwrap().len(), 5);
        assert_eq!(body["source"], "rules");
        assert_eq!(body["used_fallback"], true);
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn test_named_fields_with_profile() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), ScoringPolicy::RulesOnly);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/assessments/diabetes",
            Some(json!({
                "fields": { "glucose": 150, "blood_pressure": 135, "bmi": 32 },
                "profile": { "age": 45 }
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["result"]["score"], 65);
        assert_eq!(body["features"][7], 45.0);
        assert_eq!(body["used_fallback"], false);
    }

    #[tokio::test]
    async fn test_model_verdict_returned() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("stress_model.json"),
            r#"{"kind":"threshold","feature":2,"threshold":0.5,"width":5}"#,
        )
        .unwrap();
        let app = app_with(dir.path(), ScoringPolicy::ModelThenRules);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/assessments/stress",
            Some(json!({ "features": [25, 0, 0, 50, 1] })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["source"], "model");
        assert_eq!(body["model"]["label"], "Low Stress Risk");
        assert_eq!(body["result"]["score"], 90);

        let (_, models) = send(&app, Method::GET, "/api/v1/models", None).await;
        assert_eq!(models[2]["category"], "stress");
        assert_eq!(models[2]["status"], "loaded");
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), ScoringPolicy::RulesOnly);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/assessments/kidney",
            Some(json!({ "features": [1, 2] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "UNKNOWN_CATEGORY");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/assessments/fitness",
            Some(json!({ "features": [1, 2] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "INVALID_INPUT");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/assessments/fitness",
            Some(json!({ "features": [-5, 2500, 30, 300] })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "VALIDATION_FAILED");
        assert_eq!(body["details"]["errors"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_model_only_without_model() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), ScoringPolicy::ModelOnly);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/assessments/fitness",
            Some(json!({ "features": [3000, 1200, 5, 700] })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "MODEL_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_history_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), ScoringPolicy::RulesOnly);

        for features in [json!([3000, 1200, 5, 700]), json!([9000, 2500, 7, 300])] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/api/v1/assessments/fitness",
                Some(json!({ "features": features })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, Method::GET, "/api/v1/assessments?limit=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["risk_flag"], false);

        let (_, body) = send(&app, Method::GET, "/api/v1/assessments/fitness", None).await;
        assert_eq!(body["count"], 2);
        let id = body["data"][1]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/records/{}", id);
        let (status, record) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["score"], 65);

        let (status, report) = send(&app, Method::GET, "/api/v1/report.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["assessments"].as_array().unwrap().len(), 1);
        assert_eq!(report["assessments"][0]["score"], 95);

        let (status, body) = send(&app, Method::DELETE, "/api/v1/assessments", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], 2);
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), ScoringPolicy::RulesOnly);

        let (status, _) = send(&app, Method::GET, "/metrics", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), ScoringPolicy::RulesOnly);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/assessments/fitness",
            Some(json!({ "features": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "INVALID_INPUT");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_record_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(dir.path(), ScoringPolicy::RulesOnly);

        let uri = format!("/api/v1/records/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_preloaded_models_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("fitness_model.json"),
            r#"{"kind":"threshold","feature":0,"threshold":5000,"width":4}"#,
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.models.search_dirs = vec![dir.path().to_string_lossy().into_owned()];
        let state = AppState::new(&config);
        assert_eq!(state.service.registry().preload(), 1);
        let app = create_router(Arc::new(RwLock::new(state)));

        let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["models_loaded"], 1);

        let (_, models) = send(&app, Method::GET, "/api/v1/models", None).await;
        assert_eq!(models[0]["status"], "missing");
        assert_eq!(models[3]["status"], "loaded");
    }
}
