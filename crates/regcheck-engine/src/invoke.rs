//! Shared oracle invocation: one concurrency permit and one deadline per call.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use regcheck_oracle::{Oracle, OracleError};

/// Wraps an [`Oracle`] with a batch-wide concurrency cap and a per-call timeout.
///
/// Clones share the same semaphore, so every component built from one
/// invoker draws from the same pool of permits.
#[derive(Clone)]
pub struct Invoker {
    oracle: Arc<dyn Oracle>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker")
            .field("oracle", &self.oracle.name())
            .field("available_permits", &self.permits.available_permits())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Invoker {
    /// At most `max_concurrency` calls run at once (a value of 0 is treated as 1).
    pub fn new(oracle: Arc<dyn Oracle>, max_concurrency: usize, timeout: Duration) -> Self {
        Self {
            oracle,
            permits: Arc::new(Semaphore::new(max_concurrency.max(1))),
            timeout,
        }
    }

    /// Name of the underlying oracle backend.
    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// The per-call deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run one prompt through the oracle.
    ///
    /// The deadline starts once a permit is held, so queueing behind other
    /// calls does not count against it. On expiry the oracle future is
    /// dropped, which kills a CLI child process.
    pub async fn call(&self, prompt: &str) -> Result<Vec<u8>, OracleError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| OracleError::Unavailable("invocation pool closed".into()))?;

        match tokio::time::timeout(self.timeout, self.oracle.infer(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(OracleError::Timeout {
                elapsed: self.timeout,
            }),
        }
    }
}
