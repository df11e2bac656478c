//! The `ComplianceEngine` facade: extraction followed by a batch check.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use regcheck_core::{CheckReport, CheckStats, Rule, Transaction};
use regcheck_oracle::{build_oracle, Oracle, OracleError};

use crate::batch::BatchChecker;
use crate::evaluate::ViolationEvaluator;
use crate::extract::{Extraction, RuleExtractor};
use crate::invoke::Invoker;
use crate::settings::{EngineConfig, Settings};

/// Runs whole compliance checks against one oracle.
///
/// Cheap to clone; clones share the oracle and its concurrency pool.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    extractor: RuleExtractor,
    checker: BatchChecker,
}

impl ComplianceEngine {
    /// Build an engine around an existing oracle.
    pub fn new(oracle: Arc<dyn Oracle>, config: &EngineConfig) -> Self {
        let invoker = Invoker::new(oracle, config.max_concurrency, config.call_timeout());
        Self {
            extractor: RuleExtractor::new(invoker.clone(), config.prompts.clone()),
            checker: BatchChecker::new(ViolationEvaluator::new(invoker, config.prompts.clone())),
        }
    }

    /// Build the configured oracle and an engine around it.
    pub fn from_settings(settings: &Settings) -> Result<Self, OracleError> {
        let oracle = build_oracle(&settings.oracle)?;
        Ok(Self::new(oracle, &settings.engine))
    }

    /// Extract rules from `document` without checking anything.
    pub async fn extract_rules(&self, document: &str) -> Extraction {
        self.extractor.extract_rules(document).await
    }

    /// Derive rules from `document`, then check every transaction against them.
    pub async fn check(&self, document: &str, transactions: &[Transaction]) -> CheckReport {
        let extraction = self.extractor.extract_rules(document).await;
        let mut report = self.check_with_rules(&extraction.rules, transactions).await;
        report.stats.rules_skipped = extraction.skipped;
        report.stats.extraction_failed = extraction.failure.is_some();
        report
    }

    /// Check transactions against caller-supplied rules.
    ///
    /// Rule ids must be unique within a set. A set that repeats an id is
    /// renumbered `1..n` in order before checking, so every rule is still
    /// evaluated.
    pub async fn check_with_rules(&self, rules: &[Rule], transactions: &[Transaction]) -> CheckReport {
        let rules = with_unique_ids(rules);
        let outcome = self.checker.check_all(transactions, &rules).await;
        CheckReport {
            violations: outcome.reports,
            stats: CheckStats {
                transactions: transactions.len(),
                rules_extracted: rules.len(),
                evaluations: outcome.evaluations,
                evaluations_failed: outcome.evaluations_failed,
                violations: outcome.violations,
                ..CheckStats::default()
            },
        }
    }
}

fn with_unique_ids(rules: &[Rule]) -> Cow<'_, [Rule]> {
    let mut seen = HashSet::new();
    if rules.iter().all(|rule| seen.insert(rule.id)) {
        return Cow::Borrowed(rules);
    }
    tracing::warn!(
        rules = rules.len(),
        distinct_ids = seen.len(),
        "rule ids are not unique; renumbering"
    );
    Cow::Owned(
        rules
            .iter()
            .zip(1..)
            .map(|(rule, id)| Rule {
                id,
                ..rule.clone()
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use regcheck_oracle::stub::StaticOracle;
    use regcheck_oracle::OracleConfig;

    fn rule(id: u64, description: &str) -> Rule {
        Rule {
            id,
            transaction_type: "auto".into(),
            description: description.into(),
            condition: String::new(),
        }
    }

    #[test]
    fn builds_from_default_settings() {
        assert!(ComplianceEngine::from_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn bad_oracle_url_is_an_error() {
        let settings = Settings {
            oracle: OracleConfig {
                backend: regcheck_oracle::OracleBackend::Http,
                base_url: "nope".into(),
                ..OracleConfig::default()
            },
            ..Settings::default()
        };
        assert!(ComplianceEngine::from_settings(&settings).is_err());
    }

    #[test]
    fn unique_ids_are_kept() {
        let rules = vec![rule(7, "cap"), rule(3, "kyc")];
        assert!(matches!(with_unique_ids(&rules), Cow::Borrowed(_)));
    }

    #[tokio::test]
    async fn rules_sharing_an_id_are_all_evaluated() {
        let oracle = Arc::new(StaticOracle::new(r#"{"violation": true}"#));
        let engine = ComplianceEngine::new(oracle.clone(), &EngineConfig::default());
        let rules = vec![rule(1, "cap"), rule(1, "kyc")];
        let txns = Transaction::from_rows([serde_json::json!({"transaction_type": "auto"})
            .as_object()
            .cloned()
            .unwrap()]);

        let report = engine.check_with_rules(&rules, &txns).await;

        let described: Vec<&str> = report.violations[0]
            .errors
            .iter()
            .map(|v| v.rule.as_str())
            .collect();
        assert_eq!(described, vec!["cap", "kyc"]);
        assert_eq!(report.stats.evaluations, 2);
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn empty_batch_is_clean() {
        let engine = ComplianceEngine::new(
            Arc::new(StaticOracle::new("[]")),
            &EngineConfig::default(),
        );
        let report = engine.check("no rules here", &[]).await;
        assert!(report.is_clean());
        assert_eq!(report.stats, CheckStats::default());
    }
}
