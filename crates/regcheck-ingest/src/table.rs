//! Transaction table decoding.
//!
//! `.json` files hold an array of objects. Everything else is CSV with a
//! header row; cells are typed the way a dataframe loader would type them:
//!
//! | Cell              | Value          |
//! |-------------------|----------------|
//! | empty             | `null`         |
//! | `42`, `-7`        | integer        |
//! | `2.5`, `1e3`      | float          |
//! | `true` / `FALSE`  | bool           |
//! | anything else     | string (as-is) |

use std::path::Path;

use serde_json::{Map, Number, Value};

use regcheck_core::Transaction;

use crate::error::{IngestError, InputFormatError};

/// Decode the table at `path` into transactions numbered from 1.
pub fn decode_table(path: &Path) -> Result<Vec<Transaction>, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_table_bytes(&bytes, &path.display().to_string())?)
}

/// Decode an in-memory table; `name` selects the format.
pub fn decode_table_bytes(bytes: &[u8], name: &str) -> Result<Vec<Transaction>, InputFormatError> {
    let is_json = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let rows = if is_json {
        json_rows(bytes, name)?
    } else {
        csv_rows(bytes, name)?
    };
    tracing::debug!(name, rows = rows.len(), "transaction table decoded");
    Ok(Transaction::from_rows(rows))
}

fn csv_rows(bytes: &[u8], name: &str) -> Result<Vec<Map<String, Value>>, InputFormatError> {
    let csv_err = |source| InputFormatError::Csv {
        name: name.to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let headers = reader.headers().map_err(csv_err)?.clone();
    if headers.is_empty() {
        return Err(InputFormatError::MissingHeader {
            name: name.to_string(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.to_string(), typed_cell(cell)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn typed_cell(raw: &str) -> Value {
    let cell = raw.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = cell.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    if cell.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(raw.to_string())
}

fn json_rows(bytes: &[u8], name: &str) -> Result<Vec<Map<String, Value>>, InputFormatError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|source| InputFormatError::Json {
        name: name.to_string(),
        source,
    })?;
    let Value::Array(items) = value else {
        return Err(InputFormatError::NotAnArray {
            name: name.to_string(),
        });
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(fields),
            _ => Err(InputFormatError::RowNotObject {
                name: name.to_string(),
                index,
            }),
        })
        .collect()
}
