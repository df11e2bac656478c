//! Ingest errors.
//!
//! Every variant means the caller supplied something unusable. The API maps
//! them to 400 and the CLI to exit code 2.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading an uploaded document or table.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Text could not be extracted from a PDF.
    #[error("failed to extract text from PDF {name}: {detail}")]
    Pdf { name: String, detail: String },

    /// The transaction table is not decodable.
    #[error(transparent)]
    Format(#[from] InputFormatError),
}

/// A transaction table that cannot be decoded into rows.
#[derive(Debug, Error)]
pub enum InputFormatError {
    /// CSV syntax error, ragged row, or invalid UTF-8.
    #[error("invalid CSV in {name}: {source}")]
    Csv { name: String, source: csv::Error },

    /// The CSV has no header row.
    #[error("CSV {name} has no header row")]
    MissingHeader { name: String },

    /// JSON syntax error.
    #[error("invalid JSON in {name}: {source}")]
    Json {
        name: String,
        source: serde_json::Error,
    },

    /// A JSON table that is not an array.
    #[error("JSON table {name} must be an array of objects")]
    NotAnArray { name: String },

    /// A JSON table element that is not an object.
    #[error("JSON table {name}: element {index} is not an object")]
    RowNotObject { name: String, index: usize },
}
