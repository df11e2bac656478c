//! # Transactions
//!
//! One [`Transaction`] per input row: an ordered field map plus the row's
//! 1-based position in the source table.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rule::{normalize_type, ANY_TRANSACTION_TYPE};

/// Name of the field that scopes a transaction to rules.
pub const TRANSACTION_TYPE_FIELD: &str = "transaction_type";

/// A single input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// 1-based position of the row in the input table.
    pub row: usize,
    /// Field name to value, in the table's column order.
    pub fields: Map<String, Value>,
}

impl Transaction {
    /// Create a transaction for the given 1-based row.
    pub fn new(row: usize, fields: Map<String, Value>) -> Self {
        Self { row, fields }
    }

    /// Build a sequence of transactions from field maps, numbering rows from 1.
    pub fn from_rows(rows: impl IntoIterator<Item = Map<String, Value>>) -> Vec<Self> {
        rows.into_iter()
            .enumerate()
            .map(|(i, fields)| Self::new(i + 1, fields))
            .collect()
    }

    /// The transaction's type, lower-cased.
    ///
    /// Defaults to `"any"` when the field is absent, null, or blank.
    /// Non-string values are rendered as their JSON text.
    pub fn transaction_type(&self) -> String {
        let raw = match self.fields.get(TRANSACTION_TYPE_FIELD) {
            None | Some(Value::Null) => return ANY_TRANSACTION_TYPE.to_string(),
            Some(Value::String(s)) => normalize_type(s),
            Some(other) => normalize_type(&other.to_string()),
        };
        if raw.is_empty() {
            ANY_TRANSACTION_TYPE.to_string()
        } else {
            raw
        }
    }

    /// Look up a field value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn txn(value: Value) -> Transaction {
        match value {
            Value::Object(map) => Transaction::new(1, map),
            _ => unreachable!("test fixtures are objects"),
        }
    }

    #[test]
    fn type_is_lowercased() {
        let t = txn(json!({"transaction_type": "Mortgage", "amount": 10}));
        assert_eq!(t.transaction_type(), "mortgage");
    }

    #[test]
    fn missing_type_defaults_to_any() {
        assert_eq!(txn(json!({"amount": 10})).transaction_type(), "any");
        assert_eq!(
            txn(json!({"transaction_type": null})).transaction_type(),
            "any"
        );
        assert_eq!(
            txn(json!({"transaction_type": "   "})).transaction_type(),
            "any"
        );
    }

    #[test]
    fn numeric_type_is_rendered() {
        assert_eq!(txn(json!({"transaction_type": 7})).transaction_type(), "7");
    }

    #[test]
    fn from_rows_numbers_from_one_and_keeps_order() {
        let rows = vec![
            json!({"b": 1, "a": 2}),
            json!({"transaction_type": "auto"}),
        ]
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(m) => Some(m),
            _ => None,
        });
        let txns = Transaction::from_rows(rows);
        assert_eq!(txns[0].row, 1);
        assert_eq!(txns[1].row, 2);
        let keys: Vec<_> = txns[0].fields.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
