//! # regcheck-api: Binary Entry Point
//!
//! Environment:
//! - `PORT` (default 8000)
//! - `REGCHECK_CONFIG`: optional YAML settings file
//! - `REGCHECK_UPLOAD_DIR` (default `uploads`)
//! - `REGCHECK_BODY_LIMIT_BYTES` (default 32 MiB)
//! - `RUST_LOG` (default `info`)
//! - plus the `REGCHECK_*` oracle and engine overrides

use std::path::PathBuf;

use metrics_exporter_prometheus::PrometheusBuilder;
use regcheck_api::state::{AppConfig, AppState, DEFAULT_BODY_LIMIT};
use regcheck_engine::{ComplianceEngine, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let upload_dir = std::env::var("REGCHECK_UPLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("uploads"));
    let body_limit = std::env::var("REGCHECK_BODY_LIMIT_BYTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_BODY_LIMIT);
    let config = AppConfig {
        port,
        upload_dir,
        body_limit,
    };

    let settings_path = std::env::var_os("REGCHECK_CONFIG").map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref()).map_err(|e| {
        tracing::error!("Settings could not be loaded: {e}");
        e
    })?;

    let engine = ComplianceEngine::from_settings(&settings).map_err(|e| {
        tracing::error!("Oracle initialization failed: {e}");
        e
    })?;

    let metrics = PrometheusBuilder::new().install_recorder().map_err(|e| {
        tracing::error!("Prometheus recorder installation failed: {e}");
        e
    })?;
    regcheck_engine::telemetry::describe();

    let state = AppState::new(engine, config).with_metrics(metrics);
    let app = regcheck_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("regcheck API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
