//! # Compliance Rules
//!
//! A [`Rule`] is a structured compliance constraint derived from the free
//! text of a regulatory document. The `condition` is prose, not an
//! expression: judging it against a transaction is delegated to the oracle.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MalformedRuleError;

/// Transaction type sentinel that matches every transaction.
pub const ANY_TRANSACTION_TYPE: &str = "any";

/// A structured compliance rule scoped to a transaction type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Position in the extracted rule set (1-based, extraction order).
    pub id: u64,
    /// Transaction type the rule applies to, or `"any"`.
    pub transaction_type: String,
    /// Human-readable rule text, surfaced verbatim in violation reports.
    pub description: String,
    /// Plain-language statement of the logical check.
    #[serde(default)]
    pub condition: String,
}

impl Rule {
    /// Build a rule from one element of the oracle's decoded rule array.
    ///
    /// `index` is the element's position in the array (for diagnostics) and
    /// `id` the number the extractor assigns to it. Any id the oracle put in
    /// the element is ignored.
    ///
    /// `description` and `transaction_type` are required non-blank strings.
    /// `condition` is optional; non-string values are kept as JSON text.
    pub fn from_value(index: usize, id: u64, value: &Value) -> Result<Self, MalformedRuleError> {
        let obj = value
            .as_object()
            .ok_or(MalformedRuleError::NotAnObject { index })?;

        let required = |field: &'static str| -> Result<String, MalformedRuleError> {
            obj.get(field)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .ok_or(MalformedRuleError::MissingField { index, field })
        };

        let description = required("description")?;
        let transaction_type = required("transaction_type")?;
        let condition = match obj.get("condition") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string(),
        };

        Ok(Self {
            id,
            transaction_type,
            description,
            condition,
        })
    }

    /// Whether this rule applies to a transaction of the given type.
    ///
    /// True iff the rule is typed `"any"` or its type equals
    /// `transaction_type`, both compared case-insensitively.
    pub fn applies_to(&self, transaction_type: &str) -> bool {
        let own = normalize_type(&self.transaction_type);
        own == ANY_TRANSACTION_TYPE || own == normalize_type(transaction_type)
    }

    /// Whether this rule is typed with the `"any"` sentinel.
    pub fn is_universal(&self) -> bool {
        normalize_type(&self.transaction_type) == ANY_TRANSACTION_TYPE
    }
}

/// Canonical form of a transaction type: trimmed and lower-cased.
pub fn normalize_type(raw: &str) -> String {
    raw.trim().to_lowercase()
}
