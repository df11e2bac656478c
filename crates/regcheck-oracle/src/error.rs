//! Oracle invocation error types.

/// Errors from invoking the oracle.
///
/// None of these is fatal to a compliance check: the pipeline treats every
/// variant exactly like undecodable output.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The oracle process could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    /// The oracle process exited unsuccessfully.
    #[error("`{command}` exited with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status: String,
        stderr: String,
    },
    /// The call did not finish within the configured deadline.
    #[error("oracle call timed out after {elapsed:?}")]
    Timeout { elapsed: std::time::Duration },
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The HTTP endpoint returned a non-2xx status.
    #[error("oracle {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The oracle is not available (stub or disabled backend).
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
