//! # regcheck-cli: Command-Line Interface
//!
//! ## Subcommands
//!
//! - `check`: derive rules from a document and check a transaction table
//! - `extract`: print the rules the oracle derives from a document
//! - `decode`: run the response decoder on captured oracle output
//!
//! ## Exit codes
//!
//! `0` success, `1` nothing recoverable (`decode`) or an operational
//! failure, `2` unreadable or undecodable input: a document, table, rules
//! file, captured output file or settings file.
//!
//! Handlers take the engine and an output writer as parameters so they can
//! be driven from tests without an oracle process or a terminal.

pub mod check;
pub mod decode;
pub mod extract;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;

use regcheck_engine::{Settings, SettingsError};

/// A file named on the command line could not be used.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The rules file is not a JSON array of rules.
    #[error("failed to parse rules file {path}: {source}")]
    RulesJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load settings from an optional YAML file plus the environment.
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    Settings::load(config).context("failed to load settings")
}

/// Write `value` as JSON followed by a newline.
pub fn write_json<T: Serialize>(out: &mut impl Write, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Exit code for a failed command: `2` when the cause is bad input.
///
/// Scratch or output I/O failures (a closed stdout, a runtime that cannot
/// start) are operational and exit `1`.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    let bad_input = err.chain().any(|cause| {
        cause.is::<regcheck_ingest::IngestError>()
            || cause.is::<regcheck_ingest::InputFormatError>()
            || cause.is::<InputError>()
            || cause.is::<SettingsError>()
    });
    if bad_input {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_errors_exit_with_two() {
        let err = anyhow::Error::new(regcheck_ingest::IngestError::Pdf {
            name: "r.pdf".into(),
            detail: "bad xref".into(),
        })
        .context("reading rules document");
        assert_eq!(exit_code_for(&err), 2);
    }

    #[test]
    fn other_errors_exit_with_one() {
        assert_eq!(exit_code_for(&anyhow::anyhow!("oracle misconfigured")), 1);
    }

    #[test]
    fn output_io_errors_exit_with_one() {
        let err = anyhow::Error::new(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "stdout closed",
        ));
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn settings_errors_exit_with_two() {
        let missing = load_settings(Some(Path::new("/nonexistent/regcheck.yaml"))).unwrap_err();
        assert_eq!(exit_code_for(&missing), 2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "engine: just a string\n").unwrap();
        let malformed = load_settings(Some(&path)).unwrap_err();
        assert_eq!(exit_code_for(&malformed), 2);
    }

    #[test]
    fn compact_and_pretty_json() {
        let mut compact = Vec::new();
        write_json(&mut compact, &serde_json::json!({"a": [1]}), false).unwrap();
        assert_eq!(compact, b"{\"a\":[1]}\n");

        let mut pretty = Vec::new();
        write_json(&mut pretty, &serde_json::json!({"a": 1}), true).unwrap();
        assert_eq!(String::from_utf8(pretty).unwrap(), "{\n  \"a\": 1\n}\n");
    }
}
