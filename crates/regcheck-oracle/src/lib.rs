//! # regcheck-oracle -- Inference oracle boundary
//!
//! The oracle is an external natural-language model treated as a black box:
//! it takes one free-text prompt and returns raw bytes of unknown encoding
//! and unconstrained format. Nothing here interprets those bytes; recovering
//! structure is the job of the response decoder in `regcheck-engine`.
//!
//! ## Backends
//!
//! - [`CliOracle`] -- spawns `ollama run <model> <prompt>` (command and
//!   arguments configurable) and returns its stdout.
//! - [`HttpOracle`] -- calls the Ollama `/api/generate` endpoint and returns
//!   the `response` field.
//! - [`stub`] -- deterministic oracles for tests.
//!
//! ## Architecture
//!
//! All oracle interaction goes through the [`Oracle`] trait so a stub or a
//! deterministic rule engine can be substituted without touching the pipeline.
//! Timeouts and concurrency limits are applied by the caller, which wraps
//! every `infer` future; backends must therefore be cancel-safe (the CLI
//! backend kills its child process when the future is dropped).

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod stub;

pub use cli::CliOracle;
pub use config::{ConfigError, OracleBackend, OracleConfig};
pub use error::OracleError;
pub use http::HttpOracle;

use std::sync::Arc;

use async_trait::async_trait;

/// A natural-language inference service invoked with a single prompt.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Short backend name for logs (e.g. `"cli"`, `"http"`).
    fn name(&self) -> &str;

    /// Run one inference and return the raw output bytes.
    async fn infer(&self, prompt: &str) -> Result<Vec<u8>, OracleError>;
}

/// Build the oracle selected by `config.backend`.
pub fn build_oracle(config: &OracleConfig) -> Result<Arc<dyn Oracle>, OracleError> {
    let oracle: Arc<dyn Oracle> = match config.backend {
        OracleBackend::Cli => Arc::new(CliOracle::from_config(config)),
        OracleBackend::Http => Arc::new(HttpOracle::new(config)?),
    };
    tracing::info!(
        backend = oracle.name(),
        model = %config.model,
        "inference oracle configured"
    );
    Ok(oracle)
}
