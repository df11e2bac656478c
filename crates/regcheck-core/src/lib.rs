#![deny(missing_docs)]

//! # regcheck-core: Foundational Types for regcheck
//!
//! This crate defines the records that flow through the rule derivation and
//! transaction-evaluation pipeline. It has no internal crate dependencies. It uses
//! `serde`, `serde_json` and `thiserror`, plus `utoipa` behind the `openapi`
//! feature.
//!
//! ## Design Principles
//!
//! 1. **Rules are immutable once extracted.** A [`Rule`] is built by the
//!    extractor, numbered in extraction order, and only read afterwards.
//!
//! 2. **Transactions keep their row.** A [`Transaction`] carries its 1-based
//!    input position so reports can point back at the source table.
//!
//! 3. **Reports are sparse.** A [`ViolationReport`] exists only for rows with
//!    at least one [`Violation`].
//!
//! 4. **[`RegcheckError`] hierarchy.** Structured errors with `thiserror`. None
//!    of the oracle-facing errors is fatal to a batch; callers degrade them to
//!    "no finding" and count them in [`CheckStats`].

pub mod error;
pub mod report;
pub mod rule;
pub mod transaction;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{DecodeError, MalformedRuleError, RegcheckError, Shape};
pub use report::{CheckReport, CheckStats, Violation, ViolationReport};
pub use rule::{normalize_type, Rule, ANY_TRANSACTION_TYPE};
pub use transaction::{Transaction, TRANSACTION_TYPE_FIELD};
