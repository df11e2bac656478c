//! # Violation Evaluator
//!
//! Asks the oracle whether one transaction breaches one rule and interprets
//! the answer as a [`Verdict`]. An answer that cannot be obtained or decoded
//! is [`Verdict::Undetermined`], which reports no violation.

use serde_json::Value;

use regcheck_core::{Rule, Shape, Transaction, Violation};

use crate::decode::try_decode;
use crate::invoke::Invoker;
use crate::prompt::PromptTemplates;
use crate::telemetry;

/// The oracle's judgment on one (transaction, rule) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The rule is breached.
    Violated(Violation),
    /// The oracle answered and found no breach.
    Compliant,
    /// No usable answer; the string says why.
    Undetermined(String),
}

impl Verdict {
    /// The violation, if the verdict is [`Verdict::Violated`].
    pub fn into_violation(self) -> Option<Violation> {
        match self {
            Self::Violated(v) => Some(v),
            Self::Compliant | Self::Undetermined(_) => None,
        }
    }

    /// Whether an answer was obtained and decoded.
    pub fn is_determined(&self) -> bool {
        !matches!(self, Self::Undetermined(_))
    }
}

/// Interpret a decoded verdict object for `rule`.
///
/// A missing or falsy `violation` field is [`Verdict::Compliant`].
pub fn verdict_from_value(rule: &Rule, value: &Value) -> Verdict {
    if !value.get("violation").is_some_and(is_truthy) {
        return Verdict::Compliant;
    }
    Verdict::Violated(Violation {
        rule: rule.description.clone(),
        reason: text_field(value, "reason"),
        remediation: text_field(value, "remediation"),
    })
}

/// Loose truthiness of the oracle's `violation` flag.
///
/// `true`, the strings `"true"`, `"yes"`, `"y"`, `"1"` (any case), and
/// non-zero numbers are truthy. Everything else is falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

fn text_field(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Judges (transaction, rule) pairs via the oracle.
#[derive(Debug, Clone)]
pub struct ViolationEvaluator {
    invoker: Invoker,
    templates: PromptTemplates,
}

impl ViolationEvaluator {
    /// Create an evaluator using `templates.evaluation`.
    pub fn new(invoker: Invoker, templates: PromptTemplates) -> Self {
        Self { invoker, templates }
    }

    /// Judge whether `transaction` violates `rule`.
    pub async fn evaluate(&self, transaction: &Transaction, rule: &Rule) -> Verdict {
        let prompt = self.templates.evaluation_prompt(transaction, rule);
        metrics::counter!(telemetry::EVALUATIONS).increment(1);

        let verdict = match self.invoker.call(&prompt).await {
            Err(e) => {
                tracing::warn!(row = transaction.row, rule_id = rule.id, error = %e, "evaluation call failed");
                Verdict::Undetermined(e.to_string())
            }
            Ok(raw) => match try_decode(&raw, Shape::Object) {
                Ok(value) => verdict_from_value(rule, &value),
                Err(e) => {
                    tracing::warn!(row = transaction.row, rule_id = rule.id, error = %e, "evaluation output not decodable");
                    Verdict::Undetermined(e.to_string())
                }
            },
        };

        match &verdict {
            Verdict::Undetermined(_) => {
                metrics::counter!(telemetry::EVALUATION_FAILURES).increment(1);
            }
            Verdict::Violated(_) => {
                metrics::counter!(telemetry::VIOLATIONS).increment(1);
                tracing::debug!(row = transaction.row, rule_id = rule.id, "violation found");
            }
            Verdict::Compliant => {}
        }
        verdict
    }
}
