//! Deterministic oracles for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::OracleError;
use crate::Oracle;

/// Answers every prompt with the same bytes.
#[derive(Debug, Default)]
pub struct StaticOracle {
    reply: Vec<u8>,
    calls: AtomicUsize,
}

impl StaticOracle {
    /// Create an oracle that always replies with `reply`.
    pub fn new(reply: impl Into<Vec<u8>>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `infer` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Oracle for StaticOracle {
    fn name(&self) -> &str {
        "static"
    }

    async fn infer(&self, _prompt: &str) -> Result<Vec<u8>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Computes each reply from the prompt with a closure.
pub struct FnOracle<F> {
    respond: F,
}

impl<F> FnOracle<F>
where
    F: Fn(&str) -> Result<Vec<u8>, OracleError> + Send + Sync,
{
    /// Create an oracle backed by `respond`.
    pub fn new(respond: F) -> Self {
        Self { respond }
    }
}

#[async_trait]
impl<F> Oracle for FnOracle<F>
where
    F: Fn(&str) -> Result<Vec<u8>, OracleError> + Send + Sync,
{
    fn name(&self) -> &str {
        "fn"
    }

    async fn infer(&self, prompt: &str) -> Result<Vec<u8>, OracleError> {
        (self.respond)(prompt)
    }
}

/// Fails every call.
#[derive(Debug, Default)]
pub struct FailingOracle;

#[async_trait]
impl Oracle for FailingOracle {
    fn name(&self) -> &str {
        "failing"
    }

    async fn infer(&self, _prompt: &str) -> Result<Vec<u8>, OracleError> {
        Err(OracleError::Unavailable("stub oracle always fails".into()))
    }
}
