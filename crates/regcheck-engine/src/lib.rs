//! # regcheck-engine -- Rule derivation and transaction evaluation
//!
//! The pipeline behind a compliance check:
//!
//! 1. [`extract`] renders the extraction prompt, calls the oracle once, and
//!    turns the reply into [`Rule`](regcheck_core::Rule)s.
//! 2. [`matcher`] selects the rules that apply to each transaction.
//! 3. [`evaluate`] asks the oracle about each (transaction, rule) pair.
//! 4. [`batch`] runs all pairs under one concurrency cap and assembles the
//!    sparse violation list in input order.
//!
//! Oracle replies go through [`decode`] before anything looks at them.
//! Nothing in the pipeline fails because the oracle did: an unusable reply
//! becomes an empty rule set or an undetermined verdict, and the
//! [`CheckStats`](regcheck_core::CheckStats) counters say how often.

pub mod batch;
pub mod decode;
pub mod engine;
pub mod evaluate;
pub mod extract;
pub mod invoke;
pub mod matcher;
pub mod prompt;
pub mod settings;
pub mod telemetry;

pub use batch::{BatchChecker, BatchOutcome};
pub use decode::{decode, parse_text, try_decode};
pub use engine::ComplianceEngine;
pub use evaluate::{Verdict, ViolationEvaluator};
pub use extract::{Extraction, RuleExtractor};
pub use invoke::Invoker;
pub use matcher::applicable_rules;
pub use prompt::PromptTemplates;
pub use settings::{EngineConfig, Settings, SettingsError};
