//! # Integration Tests for regcheck-api
//!
//! Drives the router with `tower::ServiceExt::oneshot` and a scripted oracle:
//! multipart check happy path, upload validation, health probes, OpenAPI
//! and metrics endpoints.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use regcheck_api::state::{AppConfig, AppState};
use regcheck_engine::{ComplianceEngine, EngineConfig};
use regcheck_oracle::stub::FnOracle;

const BOUNDARY: &str = "regcheck-test-boundary";

const RULES_REPLY: &str = r#"Extracted:
[{"id": 1, "transaction_type": "auto", "description": "No auto loans over 20000", "condition": "amount > 20000"}]"#;

/// Helper: app with a scripted oracle that flags any auto loan over 20000.
fn test_app() -> (axum::Router, TempDir) {
    test_app_with(AppConfig::default())
}

/// Helper: as [`test_app`], with `config` apart from the upload directory.
fn test_app_with(config: AppConfig) -> (axum::Router, TempDir) {
    let oracle = FnOracle::new(|prompt: &str| {
        let reply = if prompt.contains("RULE TEXT:") {
            RULES_REPLY
        } else if prompt.contains("\"amount\": 25000") {
            r#"{"violation": true, "reason": "25000 > 20000", "remediation": "lower the amount"}"#
        } else {
            r#"{"violation": false}"#
        };
        Ok(reply.as_bytes().to_vec())
    });
    let engine = ComplianceEngine::new(Arc::new(oracle), &EngineConfig::default());
    let uploads = tempfile::tempdir().unwrap();
    let config = AppConfig {
        upload_dir: uploads.path().join("uploads"),
        ..config
    };
    (regcheck_api::app(AppState::new(engine, config)), uploads)
}

/// Helper: multipart/form-data body from (field, filename, content) parts.
fn multipart(parts: &[(&str, &str, &[u8])]) -> Body {
    let mut body = Vec::new();
    for (field, filename, content) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn check_request(parts: &[(&str, &str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/check")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(multipart(parts))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

// -- Check --------------------------------------------------------------------

#[tokio::test]
async fn check_reports_violating_rows() {
    let (app, uploads) = test_app();
    let response = app
        .oneshot(check_request(&[
            ("rules", "rules.txt", b"Auto loans may not exceed 20000."),
            (
                "transactions",
                "txns.csv",
                b"transaction_type,amount\nauto,25000\nmortgage,25000\nauto,100\n",
            ),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["violations"],
        json!([{
            "row": 1,
            "errors": [{
                "rule": "No auto loans over 20000",
                "reason": "25000 > 20000",
                "remediation": "lower the amount"
            }]
        }])
    );
    assert_eq!(body["stats"]["transactions"], 3);
    assert_eq!(body["stats"]["evaluations"], 2);

    let leftover = std::fs::read_dir(uploads.path().join("uploads")).unwrap().count();
    assert_eq!(leftover, 0, "scratch directory must be removed");
}

#[tokio::test]
async fn check_accepts_json_table() {
    let (app, _uploads) = test_app();
    let response = app
        .oneshot(check_request(&[
            ("transactions", "txns.json", br#"[{"transaction_type": "AUTO", "amount": 25000}]"#),
            ("rules", "rules.md", b"Auto loans may not exceed 20000."),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["violations"][0]["row"], 1);
}

#[tokio::test]
async fn missing_transactions_field_is_400() {
    let (app, _uploads) = test_app();
    let response = app
        .oneshot(check_request(&[("rules", "rules.txt", b"text")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("transactions"));
    assert_eq!(body["error"]["details"]["field"], "transactions");
}

#[tokio::test]
async fn upload_over_body_limit_is_413() {
    let (app, _uploads) = test_app_with(AppConfig {
        body_limit: 1024,
        ..AppConfig::default()
    });
    let document = vec![b'a'; 4096];
    let response = app
        .oneshot(check_request(&[
            ("rules", "rules.txt", document.as_slice()),
            ("transactions", "txns.csv", b"transaction_type\nauto\n"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn ragged_csv_is_400() {
    let (app, _uploads) = test_app();
    let response = app
        .oneshot(check_request(&[
            ("rules", "rules.txt", b"text"),
            ("transactions", "txns.csv", b"a,b\n1,2,3\n"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_multipart_body_is_rejected() {
    let (app, _uploads) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/check")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let (app, _uploads) = test_app();
    let response = app.oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let (app, _uploads) = test_app();
    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- OpenAPI & Metrics --------------------------------------------------------

#[tokio::test]
async fn openapi_document_lists_check_route() {
    let (app, _uploads) = test_app();
    let response = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/check"]["post"].is_object());
}

#[tokio::test]
async fn metrics_without_recorder_is_503() {
    let (app, _uploads) = test_app();
    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_with_recorder_renders_text() {
    let engine = ComplianceEngine::new(
        Arc::new(FnOracle::new(|_: &str| Ok(b"[]".to_vec()))),
        &EngineConfig::default(),
    );
    let recorder = PrometheusBuilder::new().build_recorder();
    let state = AppState::new(engine, AppConfig::default()).with_metrics(recorder.handle());
    let response = regcheck_api::app(state)
        .oneshot(get("/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (app, _uploads) = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
