//! Layered settings: defaults, then an optional YAML file, then environment.
//!
//! ```yaml
//! oracle:
//!   backend: http
//!   model: mistral
//!   base_url: http://ollama:11434
//! engine:
//!   call_timeout_secs: 120
//!   max_concurrency: 4
//!   prompts:
//!     evaluation: |
//!       ...{transaction}...{rule}...
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use regcheck_oracle::config::{parse_env, ConfigError};
use regcheck_oracle::OracleConfig;

use crate::prompt::PromptTemplates;

/// Pipeline tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deadline for a single oracle call, in seconds.
    pub call_timeout_secs: u64,
    /// Maximum oracle calls in flight across a batch.
    pub max_concurrency: usize,
    /// Prompt templates.
    pub prompts: PromptTemplates,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: 300,
            max_concurrency: 1,
            prompts: PromptTemplates::default(),
        }
    }
}

impl EngineConfig {
    /// The per-call deadline.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// All runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How to reach the oracle.
    pub oracle: OracleConfig,
    /// Pipeline tuning.
    pub engine: EngineConfig,
}

/// Errors loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The settings file is not valid YAML for [`Settings`].
    #[error("failed to parse settings YAML at {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// An environment override is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A value is out of range or a template lacks a placeholder.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

impl Settings {
    /// Load settings from `path` (if given) and the environment, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        settings.apply_env()?;
        settings.validate()?;
        tracing::debug!(
            backend = ?settings.oracle.backend,
            model = %settings.oracle.model,
            call_timeout_secs = settings.engine.call_timeout_secs,
            max_concurrency = settings.engine.max_concurrency,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Parse a YAML settings file without consulting the environment.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| SettingsError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse YAML settings text. An empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Override fields from `REGCHECK_*` environment variables.
    pub fn apply_env(&mut self) -> Result<(), SettingsError> {
        self.oracle.apply_env()?;
        if let Some(raw) = env_var("REGCHECK_CALL_TIMEOUT_SECS") {
            self.engine.call_timeout_secs = parse_env("REGCHECK_CALL_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = env_var("REGCHECK_MAX_CONCURRENCY") {
            self.engine.max_concurrency = parse_env("REGCHECK_MAX_CONCURRENCY", &raw)?;
        }
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.engine.call_timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "engine.call_timeout_secs must be at least 1".into(),
            ));
        }
        if self.engine.max_concurrency == 0 {
            return Err(SettingsError::Invalid(
                "engine.max_concurrency must be at least 1".into(),
            ));
        }
        let missing = self.engine.prompts.missing_placeholders();
        if !missing.is_empty() {
            return Err(SettingsError::Invalid(format!(
                "prompt templates missing placeholders: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

fn env_var(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
