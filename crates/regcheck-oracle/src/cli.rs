//! Process-backed oracle.
//!
//! Each call spawns `<command> <args...> <prompt>` (by default
//! `ollama run mistral <prompt>`), waits for it, and returns stdout
//! untouched. The child is spawned with `kill_on_drop(true)`, so a caller
//! that abandons the future on timeout also terminates the process.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::Oracle;

/// Oracle that runs a local command per prompt.
#[derive(Debug, Clone)]
pub struct CliOracle {
    command: String,
    args: Vec<String>,
}

impl CliOracle {
    /// Create an oracle running `command` with `args` followed by the prompt.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Create an oracle from configuration (`{model}` already substituted).
    pub fn from_config(config: &OracleConfig) -> Self {
        Self::new(config.command.clone(), config.resolved_args())
    }
}

#[async_trait]
impl Oracle for CliOracle {
    fn name(&self) -> &str {
        "cli"
    }

    async fn infer(&self, prompt: &str) -> Result<Vec<u8>, OracleError> {
        tracing::debug!(
            command = %self.command,
            args = ?self.args,
            prompt_len = prompt.len(),
            "invoking oracle process"
        );

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(prompt)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| OracleError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(OracleError::ExitStatus {
                command: self.command.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        if !output.stderr.is_empty() {
            tracing::trace!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "oracle process stderr"
            );
        }

        Ok(output.stdout)
    }
}
