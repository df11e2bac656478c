//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI document
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "regcheck API",
        version = "0.1.0",
        description = "Checks financial transactions against compliance rules derived from a regulatory document.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::check::check,
        crate::routes::metrics::render_metrics,
    ),
    components(schemas(
        regcheck_core::CheckReport,
        regcheck_core::ViolationReport,
        regcheck_core::Violation,
        regcheck_core::CheckStats,
        crate::routes::check::CheckUpload,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "check", description = "Compliance checks"),
        (name = "operations", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
