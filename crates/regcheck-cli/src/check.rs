//! # Check Subcommand
//!
//! `regcheck check --rules <DOC> --transactions <TABLE>` prints the
//! [`CheckReport`](regcheck_core::CheckReport) as JSON. With
//! `--rules-json <FILE>` extraction is skipped and the rules in the file are
//! used as given, except that a file repeating a rule id is renumbered.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use regcheck_core::Rule;
use regcheck_engine::ComplianceEngine;

use crate::InputError;

/// Arguments for the `regcheck check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Regulatory document (.pdf or plain text).
    #[arg(long, value_name = "DOC", required_unless_present = "rules_json")]
    pub rules: Option<PathBuf>,

    /// Transaction table (.csv with a header row, or .json array of objects).
    #[arg(long, value_name = "TABLE")]
    pub transactions: PathBuf,

    /// Use a JSON array of rules instead of extracting them from a document.
    #[arg(long, value_name = "FILE", conflicts_with = "rules")]
    pub rules_json: Option<PathBuf>,

    /// Pretty-print the report.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the check subcommand.
///
/// Returns exit code 0; violations are data, not failures.
pub async fn run_check(args: &CheckArgs, engine: &ComplianceEngine, out: &mut impl Write) -> Result<u8> {
    let transactions = regcheck_ingest::decode_table(&args.transactions)
        .with_context(|| format!("reading transactions from {}", args.transactions.display()))?;

    let report = if let Some(path) = &args.rules_json {
        let rules = load_rules_json(path)?;
        tracing::info!(rules = rules.len(), "using supplied rules");
        engine.check_with_rules(&rules, &transactions).await
    } else {
        let path = args
            .rules
            .as_deref()
            .context("either --rules or --rules-json is required")?;
        let document = regcheck_ingest::extract_text(path)
            .with_context(|| format!("reading rules document {}", path.display()))?;
        engine.check(&document, &transactions).await
    };

    if report.stats.extraction_failed {
        tracing::warn!("rule extraction failed; no transaction was evaluated");
    }
    crate::write_json(out, &report, args.pretty)?;
    Ok(0)
}

/// Parse a JSON array of rules.
pub fn load_rules_json(path: &Path) -> Result<Vec<Rule>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| InputError::RulesJson {
        path: path.to_path_buf(),
        source,
    })
}
