//! # Compliance Check Intake
//!
//! `POST /api/check` accepts a regulatory document (`rules`) and a
//! transaction table (`transactions`) as multipart file fields, runs the
//! full pipeline, and returns the [`CheckReport`].
//!
//! Uploads are written to a scratch directory created under the configured
//! upload directory as `<uuid>_<filename>` and read back through the ingest
//! collaborators. The directory is removed when the request finishes,
//! whether it succeeded or not.

use std::path::{Path, PathBuf};

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use regcheck_core::{CheckReport, Transaction};

use crate::error::AppError;
use crate::state::AppState;

/// Multipart form accepted by `POST /api/check`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckUpload {
    /// Regulatory document (`.pdf` or plain text).
    #[schema(value_type = String, format = Binary)]
    pub rules: Vec<u8>,
    /// Transaction table (`.csv` with a header row, or `.json` array of objects).
    #[schema(value_type = String, format = Binary)]
    pub transactions: Vec<u8>,
}

/// Build the check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/check", post(check))
}

/// One uploaded file.
struct Upload {
    file_name: String,
    data: Vec<u8>,
}

/// POST /api/check: Check uploaded transactions against an uploaded document.
#[utoipa::path(
    post,
    path = "/api/check",
    request_body(content = CheckUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Violations found, by transaction row", body = CheckReport),
        (status = 400, description = "Missing field or undecodable upload", body = crate::error::ErrorBody),
        (status = 413, description = "Upload exceeds the body limit", body = crate::error::ErrorBody),
    ),
    tag = "check"
)]
async fn check(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CheckReport>, AppError> {
    let mut rules: Option<Upload> = None;
    let mut transactions: Option<Upload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        let slot = match name.as_str() {
            "rules" => &mut rules,
            "transactions" => &mut transactions,
            _ => continue,
        };
        let file_name = field.file_name().unwrap_or(&name).to_string();
        let data = field.bytes().await?;
        *slot = Some(Upload {
            file_name,
            data: data.to_vec(),
        });
    }

    let rules = rules.ok_or(AppError::MissingField("rules"))?;
    let transactions = transactions.ok_or(AppError::MissingField("transactions"))?;

    let upload_dir = state.config.upload_dir.clone();
    let (document, transactions) = tokio::task::spawn_blocking(move || {
        ingest_uploads(&upload_dir, &rules, &transactions)
    })
    .await
    .map_err(|e| AppError::Internal(format!("ingest task failed: {e}")))??;

    tracing::info!(
        document_chars = document.len(),
        transactions = transactions.len(),
        "compliance check started"
    );
    let report = state.engine.check(&document, &transactions).await;
    tracing::info!(
        violations = report.stats.violations,
        rules_extracted = report.stats.rules_extracted,
        evaluations_failed = report.stats.evaluations_failed,
        "compliance check finished"
    );
    Ok(Json(report))
}

/// Persist both uploads into a fresh scratch directory and decode them.
fn ingest_uploads(
    upload_dir: &Path,
    rules: &Upload,
    transactions: &Upload,
) -> Result<(String, Vec<Transaction>), AppError> {
    std::fs::create_dir_all(upload_dir).map_err(|e| {
        AppError::Internal(format!("creating {}: {e}", upload_dir.display()))
    })?;
    let scratch = tempfile::Builder::new()
        .prefix("check-")
        .tempdir_in(upload_dir)
        .map_err(|e| AppError::Internal(format!("creating scratch dir: {e}")))?;

    let rules_path = persist(scratch.path(), rules)?;
    let transactions_path = persist(scratch.path(), transactions)?;

    let document = regcheck_ingest::extract_text(&rules_path)?;
    let transactions = regcheck_ingest::decode_table(&transactions_path)?;
    Ok((document, transactions))
}

fn persist(dir: &Path, upload: &Upload) -> Result<PathBuf, AppError> {
    let path = dir.join(scratch_name(&upload.file_name));
    std::fs::write(&path, &upload.data)
        .map_err(|e| AppError::Internal(format!("writing {}: {e}", path.display())))?;
    Ok(path)
}

/// `<uuid>_<basename>`, with any client-supplied directory components dropped.
fn scratch_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload");
    format!("{}_{base}", uuid::Uuid::new_v4())
}
