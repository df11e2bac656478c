//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Nothing here is mutated per request; each
//! check gets its own scratch directory under [`AppConfig::upload_dir`].

use std::path::PathBuf;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use regcheck_engine::ComplianceEngine;

/// Default upload body limit: 32 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 32 * 1024 * 1024;

/// Server configuration read from the environment by the binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port to listen on.
    pub port: u16,
    /// Parent directory for per-request scratch directories.
    pub upload_dir: PathBuf,
    /// Maximum accepted request body, in bytes.
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            upload_dir: PathBuf::from("uploads"),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// The compliance pipeline.
    pub engine: Arc<ComplianceEngine>,
    /// Server configuration.
    pub config: AppConfig,
    /// Prometheus render handle; `None` when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State with the given engine and configuration and no metrics handle.
    pub fn new(engine: ComplianceEngine, config: AppConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            config,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
