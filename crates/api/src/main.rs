//! Health Assessment Dashboard - Main Entry Point

use anyhow::Context;
use api::config::AppConfig;
use api::{init_logging, run_server};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config.logging);

    info!("=== Health Predictor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Model search path: {:?}", config.models.search_dirs);

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install metrics recorder")?;

    run_server(config, Some(metrics)).await
}
