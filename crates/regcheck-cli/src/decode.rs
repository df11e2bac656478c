//! # Decode Subcommand
//!
//! `regcheck decode [--shape array|object] [FILE]` runs the response decoder
//! over captured oracle output (a file, or stdin) and prints the recovered
//! JSON. Exits 1 when nothing is recoverable.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use regcheck_core::Shape;

/// JSON shape to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    /// A JSON array (rule lists).
    Array,
    /// A JSON object (verdicts).
    Object,
}

impl From<ShapeArg> for Shape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Array => Shape::Array,
            ShapeArg::Object => Shape::Object,
        }
    }
}

/// Arguments for the `regcheck decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Shape to recover.
    #[arg(long, value_enum, default_value = "array")]
    pub shape: ShapeArg,

    /// File holding raw oracle output; stdin when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Pretty-print the recovered JSON.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the decode subcommand over `stdin` unless a file is given.
pub fn run_decode(args: &DecodeArgs, stdin: &mut impl Read, out: &mut impl Write) -> Result<u8> {
    let raw = match &args.file {
        Some(path) => std::fs::read(path).map_err(|source| crate::InputError::Read {
            path: path.clone(),
            source,
        })?,
        None => {
            let mut buf = Vec::new();
            stdin.read_to_end(&mut buf).context("reading stdin")?;
            buf
        }
    };

    match regcheck_engine::try_decode(&raw, args.shape.into()) {
        Ok(value) => {
            crate::write_json(out, &value, args.pretty)?;
            Ok(0)
        }
        Err(e) => {
            eprintln!("nothing recoverable: {e}");
            Ok(1)
        }
    }
}
