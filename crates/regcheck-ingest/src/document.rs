//! Regulatory document text.
//!
//! PDFs go through `pdf-extract` (all pages, in order). Anything else is read
//! as text, with invalid UTF-8 replaced rather than rejected.

use std::path::Path;

use crate::error::IngestError;

/// Extract the text of the document at `path`, trimmed.
pub fn extract_text(path: &Path) -> Result<String, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_text_from_bytes(&bytes, &path.display().to_string())
}

/// Extract the text of an in-memory document; `name` selects the format.
pub fn extract_text_from_bytes(bytes: &[u8], name: &str) -> Result<String, IngestError> {
    let text = if is_pdf(name) {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| IngestError::Pdf {
            name: name.to_string(),
            detail: e.to_string(),
        })?
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };
    let text = text.trim().to_string();
    tracing::debug!(name, chars = text.len(), "document text extracted");
    if text.is_empty() {
        tracing::warn!(name, "document contains no text");
    }
    Ok(text)
}

fn is_pdf(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
