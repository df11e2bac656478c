//! End-to-end pipeline tests with scripted oracles.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regcheck_core::{CheckReport, Rule, Transaction};
use regcheck_engine::{ComplianceEngine, EngineConfig};
use regcheck_oracle::stub::{FnOracle, StaticOracle};
use regcheck_oracle::{Oracle, OracleError};
use serde_json::{json, Value};

const AUTO_RULES: &str = r#"Here are the extracted rules:
[
  {"id": 1, "transaction_type": "auto", "description": "No auto loans over 20000", "condition": "amount > 20000"}
]"#;

const VIOLATED: &str =
    r#"{"violation": true, "reason": "amount 25000 exceeds 20000", "remediation": "reduce the loan amount"}"#;

fn transactions(rows: Value) -> Vec<Transaction> {
    let Value::Array(rows) = rows else {
        panic!("fixture must be an array")
    };
    Transaction::from_rows(rows.into_iter().map(|row| match row {
        Value::Object(fields) => fields,
        other => panic!("fixture row must be an object: {other}"),
    }))
}

/// Answers extraction prompts with `rules` and every evaluation with `verdict`.
fn scripted(rules: &'static str, verdict: &'static str) -> Arc<dyn Oracle> {
    Arc::new(FnOracle::new(move |prompt: &str| {
        let reply = if prompt.contains("RULE TEXT:") { rules } else { verdict };
        Ok(reply.as_bytes().to_vec())
    }))
}

fn engine(oracle: Arc<dyn Oracle>, max_concurrency: usize) -> ComplianceEngine {
    let config = EngineConfig {
        max_concurrency,
        ..EngineConfig::default()
    };
    ComplianceEngine::new(oracle, &config)
}

fn violations_json(report: &CheckReport) -> Value {
    serde_json::to_value(&report.violations).unwrap()
}

#[tokio::test]
async fn auto_loan_over_limit_is_reported() {
    let engine = engine(scripted(AUTO_RULES, VIOLATED), 1);
    let txns = transactions(json!([{"transaction_type": "auto", "amount": 25000}]));

    let report = engine.check("Auto loans must not exceed 20000.", &txns).await;

    assert_eq!(
        violations_json(&report),
        json!([{
            "row": 1,
            "errors": [{
                "rule": "No auto loans over 20000",
                "reason": "amount 25000 exceeds 20000",
                "remediation": "reduce the loan amount"
            }]
        }])
    );
    assert_eq!(report.stats.rules_extracted, 1);
    assert_eq!(report.stats.evaluations, 1);
    assert_eq!(report.stats.violations, 1);
    assert!(!report.stats.extraction_failed);
}

#[tokio::test]
async fn mismatched_type_is_not_evaluated() {
    let oracle = Arc::new(StaticOracle::new(VIOLATED));
    let engine = engine(oracle.clone(), 1);
    let rules = vec![Rule {
        id: 1,
        transaction_type: "auto".into(),
        description: "No auto loans over 20000".into(),
        condition: "amount > 20000".into(),
    }];
    let txns = transactions(json!([{"transaction_type": "mortgage", "amount": 25000}]));

    let report = engine.check_with_rules(&rules, &txns).await;

    assert_eq!(violations_json(&report), json!([]));
    assert_eq!(report.stats.evaluations, 0);
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn garbage_extraction_yields_no_violations() {
    let engine = engine(scripted("I could not find any rules, sorry!", VIOLATED), 1);
    let txns = transactions(json!([
        {"transaction_type": "auto", "amount": 25000},
        {"transaction_type": "mortgage", "amount": 900000},
        {"amount": 1}
    ]));

    let report = engine.check("???", &txns).await;

    assert!(report.is_clean());
    assert_eq!(report.stats.transactions, 3);
    assert_eq!(report.stats.rules_extracted, 0);
    assert!(report.stats.extraction_failed);
}

#[tokio::test]
async fn malformed_rules_are_skipped_and_counted() {
    let rules = r#"[{"transaction_type": "auto"}, {"transaction_type": "any", "description": "KYC on file"}]"#;
    let engine = engine(scripted(rules, r#"{"violation": "yes"}"#), 1);
    let txns = transactions(json!([{"transaction_type": "auto"}]));

    let report = engine.check("doc", &txns).await;

    assert_eq!(report.stats.rules_skipped, 1);
    assert_eq!(report.stats.rules_extracted, 1);
    assert_eq!(
        violations_json(&report),
        json!([{"row": 1, "errors": [{"rule": "KYC on file", "reason": null, "remediation": null}]}])
    );
}

#[tokio::test]
async fn repeated_runs_are_identical() {
    let engine = engine(scripted(AUTO_RULES, VIOLATED), 3);
    let txns = transactions(json!([
        {"transaction_type": "auto", "amount": 25000},
        {"transaction_type": "mortgage", "amount": 1},
        {"transaction_type": "AUTO", "amount": 30000}
    ]));

    let first = engine.check("doc", &txns).await;
    let second = engine.check("doc", &txns).await;

    assert_eq!(first, second);
    let rows: Vec<usize> = first.violations.iter().map(|r| r.row).collect();
    assert_eq!(rows, vec![1, 3]);
}

/// Replies slower for earlier rows, so completions arrive in reverse order.
/// Row 3 never answers.
struct StaggeredOracle;

#[async_trait]
impl Oracle for StaggeredOracle {
    fn name(&self) -> &str {
        "staggered"
    }

    async fn infer(&self, prompt: &str) -> Result<Vec<u8>, OracleError> {
        let row: u64 = ["\"seq\": 1", "\"seq\": 2", "\"seq\": 3", "\"seq\": 4"]
            .iter()
            .position(|marker| prompt.contains(marker))
            .map(|i| i as u64 + 1)
            .unwrap_or(0);
        let delay = match row {
            3 => Duration::from_secs(3600),
            n => Duration::from_millis(400 - n * 100),
        };
        tokio::time::sleep(delay).await;
        Ok(format!(r#"{{"violation": true, "reason": "row {row}"}}"#).into_bytes())
    }
}

#[tokio::test(start_paused = true)]
async fn order_is_preserved_and_timeouts_are_isolated() {
    let config = EngineConfig {
        max_concurrency: 4,
        call_timeout_secs: 5,
        ..EngineConfig::default()
    };
    let engine = ComplianceEngine::new(Arc::new(StaggeredOracle), &config);
    let rules = vec![Rule {
        id: 1,
        transaction_type: "any".into(),
        description: "Every row".into(),
        condition: String::new(),
    }];
    let txns = transactions(json!([{"seq": 1}, {"seq": 2}, {"seq": 3}, {"seq": 4}]));

    let report = engine.check_with_rules(&rules, &txns).await;

    let rows: Vec<usize> = report.violations.iter().map(|r| r.row).collect();
    assert_eq!(rows, vec![1, 2, 4]);
    let reasons: Vec<Option<String>> = report
        .violations
        .iter()
        .map(|r| r.errors[0].reason.clone())
        .collect();
    assert_eq!(
        reasons,
        vec![Some("row 1".into()), Some("row 2".into()), Some("row 4".into())]
    );
    assert_eq!(report.stats.evaluations, 4);
    assert_eq!(report.stats.evaluations_failed, 1);
}
