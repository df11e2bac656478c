//! # regcheck CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use regcheck_cli::check::{run_check, CheckArgs};
use regcheck_cli::decode::{run_decode, DecodeArgs};
use regcheck_cli::extract::{run_extract, ExtractArgs};
use regcheck_cli::{exit_code_for, load_settings};
use regcheck_engine::ComplianceEngine;

/// regcheck: check financial transactions against rules derived from a
/// regulatory document by a language model.
#[derive(Parser, Debug)]
#[command(name = "regcheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a transaction table against a regulatory document.
    Check(CheckArgs),

    /// Print the rules extracted from a regulatory document.
    Extract(ExtractArgs),

    /// Recover JSON from raw oracle output.
    Decode(DecodeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Commands::Decode(args) => run_decode(args, &mut std::io::stdin().lock(), &mut stdout),
        Commands::Check(args) => {
            let (runtime, engine) = prepare(cli.config.as_deref())?;
            runtime.block_on(run_check(args, &engine, &mut stdout))
        }
        Commands::Extract(args) => {
            let (runtime, engine) = prepare(cli.config.as_deref())?;
            runtime.block_on(run_extract(args, &engine, &mut stdout))
        }
    }
}

/// Settings, oracle, and an async runtime for the oracle-backed subcommands.
fn prepare(config: Option<&Path>) -> Result<(tokio::runtime::Runtime, ComplianceEngine)> {
    let settings = load_settings(config)?;
    let engine = ComplianceEngine::from_settings(&settings).context("failed to configure oracle")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    Ok((runtime, engine))
}
