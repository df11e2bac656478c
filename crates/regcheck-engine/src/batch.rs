//! # Batch Orchestrator
//!
//! Runs the matcher and evaluator over every transaction and collects a
//! sparse list of [`ViolationReport`]s. All pairs are issued together and
//! throttled by the invoker's semaphore; results are reassembled in input
//! order, so the output does not depend on completion order.

use futures::future::join_all;

use regcheck_core::{Rule, Transaction, ViolationReport};

use crate::evaluate::{Verdict, ViolationEvaluator};
use crate::matcher::applicable_rules;

/// Reports plus per-batch counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// One report per transaction with at least one violation, in row order.
    pub reports: Vec<ViolationReport>,
    /// Pairs sent to the oracle.
    pub evaluations: usize,
    /// Pairs that ended [`Verdict::Undetermined`].
    pub evaluations_failed: usize,
    /// Total violations across all reports.
    pub violations: usize,
}

/// Checks batches of transactions against a fixed rule set.
#[derive(Debug, Clone)]
pub struct BatchChecker {
    evaluator: ViolationEvaluator,
}

impl BatchChecker {
    /// Create a checker around an evaluator.
    pub fn new(evaluator: ViolationEvaluator) -> Self {
        Self { evaluator }
    }

    /// Evaluate every transaction against its applicable rules.
    pub async fn check_all(&self, transactions: &[Transaction], rules: &[Rule]) -> BatchOutcome {
        let per_transaction = join_all(
            transactions
                .iter()
                .map(|transaction| self.check_one(transaction, rules)),
        )
        .await;

        let mut outcome = BatchOutcome::default();
        for (transaction, verdicts) in transactions.iter().zip(per_transaction) {
            outcome.evaluations += verdicts.len();
            let mut errors = Vec::new();
            for verdict in verdicts {
                match verdict {
                    Verdict::Violated(v) => errors.push(v),
                    Verdict::Undetermined(_) => outcome.evaluations_failed += 1,
                    Verdict::Compliant => {}
                }
            }
            if !errors.is_empty() {
                outcome.violations += errors.len();
                outcome.reports.push(ViolationReport {
                    row: transaction.row,
                    errors,
                });
            }
        }

        tracing::info!(
            transactions = transactions.len(),
            rules = rules.len(),
            evaluations = outcome.evaluations,
            evaluations_failed = outcome.evaluations_failed,
            violations = outcome.violations,
            "batch checked"
        );
        outcome
    }

    async fn check_one(&self, transaction: &Transaction, rules: &[Rule]) -> Vec<Verdict> {
        let applicable = applicable_rules(transaction, rules);
        tracing::debug!(
            row = transaction.row,
            transaction_type = %transaction.transaction_type(),
            applicable = applicable.len(),
            "evaluating transaction"
        );
        join_all(
            applicable
                .into_iter()
                .map(|rule| self.evaluator.evaluate(transaction, rule)),
        )
        .await
    }
}
