//! # Violation Reports
//!
//! Output records of a compliance check. The wire format of [`CheckReport`]
//! is `{ "violations": [ { "row", "errors": [ { "rule", "reason",
//! "remediation" } ] } ], "stats": { ... } }`.

use serde::{Deserialize, Serialize};

/// A judgment that one transaction breaches one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Violation {
    /// Description of the violated rule.
    pub rule: String,
    /// Oracle-provided explanation, if any.
    pub reason: Option<String>,
    /// Oracle-provided suggested fix, if any.
    pub remediation: Option<String>,
}

/// All violations found for a single transaction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ViolationReport {
    /// 1-based transaction index.
    pub row: usize,
    /// Violations in rule evaluation order.
    pub errors: Vec<Violation>,
}

/// Counters describing what happened during a check.
///
/// Oracle failures never surface as errors, so these counters are the only
/// place a caller can see degraded runs (e.g. `rules_extracted == 0`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CheckStats {
    /// Number of transactions examined.
    pub transactions: usize,
    /// Number of rules accepted from extraction (or supplied by the caller).
    pub rules_extracted: usize,
    /// Number of decoded rule elements skipped as malformed.
    pub rules_skipped: usize,
    /// Whether the extraction call failed outright (invocation or decode).
    pub extraction_failed: bool,
    /// Number of (transaction, rule) pairs sent to the oracle.
    pub evaluations: usize,
    /// Number of pairs whose verdict could not be obtained.
    pub evaluations_failed: usize,
    /// Total number of violations reported.
    pub violations: usize,
}

/// Result of checking a batch of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CheckReport {
    /// One entry per transaction with at least one violation, in row order.
    pub violations: Vec<ViolationReport>,
    /// Run counters.
    #[serde(default)]
    pub stats: CheckStats,
}

impl CheckReport {
    /// Whether no violations were found.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}
