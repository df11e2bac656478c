//! # Extract Subcommand
//!
//! `regcheck extract --rules <DOC>` prints the rules the oracle derives from
//! a document, as a JSON array. Useful for reviewing extraction before
//! committing a rules file for `check --rules-json`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use regcheck_engine::ComplianceEngine;

/// Arguments for the `regcheck extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Regulatory document (.pdf or plain text).
    #[arg(long, value_name = "DOC")]
    pub rules: PathBuf,

    /// Pretty-print the rules.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the extract subcommand.
///
/// Returns exit code 0 when at least one rule was extracted, 1 otherwise.
pub async fn run_extract(args: &ExtractArgs, engine: &ComplianceEngine, out: &mut impl Write) -> Result<u8> {
    let document = regcheck_ingest::extract_text(&args.rules)
        .with_context(|| format!("reading rules document {}", args.rules.display()))?;
    let extraction = engine.extract_rules(&document).await;

    if let Some(reason) = &extraction.failure {
        tracing::warn!(%reason, "extraction failed");
    }
    crate::write_json(out, &extraction.rules, args.pretty)?;
    Ok(if extraction.rules.is_empty() { 1 } else { 0 })
}
