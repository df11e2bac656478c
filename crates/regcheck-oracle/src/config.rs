//! Oracle configuration.
//!
//! Selects the backend and model and carries backend-specific settings.
//! Defaults reproduce the reference deployment: the local `ollama` binary
//! running the `mistral` model. Override via a settings file (all fields are
//! `#[serde(default)]`) and then via environment variables.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which transport reaches the oracle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleBackend {
    /// Spawn a local process per call.
    #[default]
    Cli,
    /// POST to an Ollama-compatible HTTP endpoint.
    Http,
}

impl FromStr for OracleBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cli" | "process" => Ok(Self::Cli),
            "http" => Ok(Self::Http),
            other => Err(ConfigError::InvalidValue(
                "REGCHECK_ORACLE_BACKEND".into(),
                other.into(),
            )),
        }
    }
}

/// Configuration for reaching the inference oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Transport used for every call.
    pub backend: OracleBackend,
    /// Model identifier passed to the oracle.
    pub model: String,
    /// Executable for the CLI backend.
    pub command: String,
    /// Arguments placed before the prompt for the CLI backend.
    /// The token `{model}` is replaced with [`OracleConfig::model`].
    pub args: Vec<String>,
    /// Base URL for the HTTP backend.
    pub base_url: String,
    /// Transport timeout for the HTTP backend, in seconds.
    pub http_timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            backend: OracleBackend::Cli,
            model: "mistral".into(),
            command: "ollama".into(),
            args: vec!["run".into(), "{model}".into()],
            base_url: "http://127.0.0.1:11434".into(),
            http_timeout_secs: 300,
        }
    }
}

impl OracleConfig {
    /// Defaults overridden by the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables.
    ///
    /// Variables:
    /// - `REGCHECK_ORACLE_BACKEND` (`cli` or `http`)
    /// - `REGCHECK_MODEL`
    /// - `REGCHECK_ORACLE_COMMAND`
    /// - `REGCHECK_ORACLE_URL`
    /// - `REGCHECK_ORACLE_HTTP_TIMEOUT_SECS`
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(raw) = env_var("REGCHECK_ORACLE_BACKEND") {
            self.backend = raw.parse()?;
        }
        if let Some(model) = env_var("REGCHECK_MODEL") {
            self.model = model;
        }
        if let Some(command) = env_var("REGCHECK_ORACLE_COMMAND") {
            self.command = command;
        }
        if let Some(url) = env_var("REGCHECK_ORACLE_URL") {
            self.base_url = url;
        }
        if let Some(raw) = env_var("REGCHECK_ORACLE_HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = parse_env("REGCHECK_ORACLE_HTTP_TIMEOUT_SECS", &raw)?;
        }
        Ok(())
    }

    /// CLI arguments with `{model}` substituted, not including the prompt.
    pub fn resolved_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.replace("{model}", &self.model))
            .collect()
    }
}

fn env_var(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a numeric environment value, naming the variable on failure.
pub fn parse_env<T: FromStr>(var: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(var.to_string(), raw.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
}
