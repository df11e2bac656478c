//! # regcheck-ingest -- Input collaborators
//!
//! Turns uploaded files into pipeline inputs: a regulatory document into
//! plain text ([`extract_text`]) and a transaction table into
//! [`Transaction`](regcheck_core::Transaction)s ([`decode_table`]). Both have
//! byte-slice variants for multipart uploads that never touch disk.

pub mod document;
pub mod error;
pub mod table;

pub use document::{extract_text, extract_text_from_bytes};
pub use error::{IngestError, InputFormatError};
pub use table::{decode_table, decode_table_bytes};
