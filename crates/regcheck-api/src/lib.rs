//! # regcheck-api: HTTP intake for compliance checks
//!
//! ## API Surface
//!
//! | Route                   | Module                 | Purpose                          |
//! |-------------------------|------------------------|----------------------------------|
//! | `POST /api/check`       | [`routes::check`]      | Multipart document + table check |
//! | `GET /metrics`          | [`routes::metrics`]    | Prometheus exposition            |
//! | `GET /openapi.json`     | [`openapi`]            | OpenAPI document                 |
//! | `GET /health/liveness`  | here                   | Liveness probe                   |
//! | `GET /health/readiness` | here                   | Readiness probe                  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CorsLayer (permissive) → DefaultBodyLimit → Handler
//! ```

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.body_limit;

    let api = Router::new()
        .merge(routes::check::router())
        .merge(routes::metrics::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new()
        .merge(health)
        .merge(api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: the engine is built before the server binds.
async fn readiness() -> &'static str {
    "ready"
}
