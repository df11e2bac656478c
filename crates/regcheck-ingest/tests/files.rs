//! File-based ingest tests.

use std::io::Write;

use regcheck_ingest::{decode_table, extract_text, IngestError};
use serde_json::json;

fn temp_with(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents).unwrap();
    file
}

#[test]
fn csv_file_becomes_numbered_transactions() {
    let file = temp_with(
        ".csv",
        b"transaction_type,amount\nauto,25000\nmortgage,300000\n,12\n",
    );
    let txns = decode_table(file.path()).unwrap();
    let rows: Vec<usize> = txns.iter().map(|t| t.row).collect();
    assert_eq!(rows, vec![1, 2, 3]);
    assert_eq!(txns[0].get("amount"), Some(&json!(25000)));
    assert_eq!(txns[2].transaction_type(), "any");
}

#[test]
fn extension_selects_json() {
    let file = temp_with(".json", br#"[{"transaction_type": "Auto"}]"#);
    let txns = decode_table(file.path()).unwrap();
    assert_eq!(txns[0].transaction_type(), "auto");
}

#[test]
fn bad_table_is_format_error() {
    let file = temp_with(".json", b"not json");
    assert!(matches!(
        decode_table(file.path()),
        Err(IngestError::Format(_))
    ));
}

#[test]
fn text_document_round_trip() {
    let file = temp_with(".txt", "  Règle 1: no auto loans over 20000.\n".as_bytes());
    assert_eq!(
        extract_text(file.path()).unwrap(),
        "Règle 1: no auto loans over 20000."
    );
}
