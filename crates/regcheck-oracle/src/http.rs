//! HTTP-backed oracle speaking the Ollama generate API.
//!
//! `POST {base_url}/api/generate` with `{"model", "prompt", "stream": false}`;
//! the reply's `response` field is returned as bytes. Only the envelope is
//! parsed here, the model text itself stays opaque.
//!
//! Connection failures and `503 Service Unavailable` (Ollama answers 503
//! while a model is still loading or its queue is full) are retried after
//! 200 ms, 400 ms and 800 ms. A request that hit the client timeout is not
//! retried, and neither is any other status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ConfigError, OracleConfig};
use crate::error::OracleError;
use crate::Oracle;

/// Delays before each retry.
const BACKOFF: [Duration; 3] = [
    Duration::from_millis(200),
    Duration::from_millis(400),
    Duration::from_millis(800),
];

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Oracle reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    http: reqwest::Client,
    endpoint: Url,
    model: String,
}

impl HttpOracle {
    /// Create a client for `config.base_url` using `config.model`.
    pub fn new(config: &OracleConfig) -> Result<Self, OracleError> {
        let endpoint = generate_endpoint(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| OracleError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            endpoint,
            model: config.model.clone(),
        })
    }

    /// The resolved generate endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `body`, backing off while the server is unreachable or busy.
    async fn send(&self, body: &GenerateRequest<'_>) -> Result<reqwest::Response, reqwest::Error> {
        let mut delays = BACKOFF.iter();
        loop {
            let result = self.http.post(self.endpoint.clone()).json(body).send().await;
            match delays.next() {
                Some(delay) if is_transient(&result) => {
                    tracing::warn!(
                        endpoint = %self.endpoint,
                        outcome = %describe(&result),
                        "oracle busy or unreachable, retrying in {delay:?}"
                    );
                    tokio::time::sleep(*delay).await;
                }
                _ => return result,
            }
        }
    }
}

fn is_transient(result: &Result<reqwest::Response, reqwest::Error>) -> bool {
    match result {
        Ok(resp) => resp.status() == StatusCode::SERVICE_UNAVAILABLE,
        Err(e) => !e.is_timeout(),
    }
}

fn describe(result: &Result<reqwest::Response, reqwest::Error>) -> String {
    match result {
        Ok(resp) => resp.status().to_string(),
        Err(e) => e.to_string(),
    }
}

fn generate_endpoint(base_url: &str) -> Result<Url, ConfigError> {
    let invalid = |e: url::ParseError| {
        ConfigError::InvalidUrl("REGCHECK_ORACLE_URL".into(), e.to_string())
    };
    let mut base = Url::parse(base_url).map_err(invalid)?;
    // Url::join replaces the last path segment unless the base ends in '/'.
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("api/generate").map_err(invalid)
}

#[async_trait]
impl Oracle for HttpOracle {
    fn name(&self) -> &str {
        "http"
    }

    async fn infer(&self, prompt: &str) -> Result<Vec<u8>, OracleError> {
        let endpoint = self.endpoint.as_str();
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        tracing::debug!(endpoint, model = %self.model, prompt_len = prompt.len(), "calling oracle");

        let resp = self
            .send(&body)
            .await
            .map_err(|e| OracleError::Http {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OracleError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse =
            resp.json()
                .await
                .map_err(|e| OracleError::Deserialization {
                    endpoint: endpoint.to_string(),
                    source: e,
                })?;
        Ok(parsed.response.into_bytes())
    }
}
