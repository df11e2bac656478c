//! # Rule Matcher
//!
//! Selects the rules that apply to a transaction. A rule applies when it is
//! typed `"any"` or its type equals the transaction's, case-insensitively.
//! A transaction with no type is treated as `"any"` and therefore only
//! matches universal rules.

use std::collections::HashSet;

use regcheck_core::{Rule, Transaction};

/// Rules from `rules` that apply to `transaction`, in input order.
///
/// When several rules share an `id`, only the first is returned.
pub fn applicable_rules<'a>(transaction: &Transaction, rules: &'a [Rule]) -> Vec<&'a Rule> {
    let transaction_type = transaction.transaction_type();
    let mut seen = HashSet::new();
    rules
        .iter()
        .filter(|rule| rule.applies_to(&transaction_type))
        .filter(|rule| seen.insert(rule.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn txn(value: Value) -> Transaction {
        let Value::Object(fields) = value else {
            unreachable!("fixtures are objects")
        };
        Transaction::new(1, fields)
    }

    fn rule(id: u64, transaction_type: &str) -> Rule {
        Rule {
            id,
            transaction_type: transaction_type.into(),
            description: format!("rule {id}"),
            condition: String::new(),
        }
    }

    fn ids(rules: Vec<&Rule>) -> Vec<u64> {
        rules.into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn matches_type_case_insensitively_and_keeps_order() {
        let rules = vec![rule(1, "Mortgage"), rule(2, "any"), rule(3, "AUTO"), rule(4, "auto ")];
        let t = txn(json!({"transaction_type": "auto", "amount": 25000}));
        assert_eq!(ids(applicable_rules(&t, &rules)), vec![2, 3, 4]);
    }

    #[test]
    fn untyped_transaction_matches_only_universal_rules() {
        let rules = vec![rule(1, "auto"), rule(2, "ANY")];
        let t = txn(json!({"amount": 10}));
        assert_eq!(ids(applicable_rules(&t, &rules)), vec![2]);
    }

    #[test]
    fn duplicate_ids_are_yielded_once() {
        let rules = vec![rule(1, "any"), rule(1, "auto"), rule(2, "auto")];
        let t = txn(json!({"transaction_type": "auto"}));
        assert_eq!(ids(applicable_rules(&t, &rules)), vec![1, 2]);
    }

    #[test]
    fn empty_rule_set_matches_nothing() {
        let t = txn(json!({"transaction_type": "auto"}));
        assert!(applicable_rules(&t, &[]).is_empty());
    }

    proptest! {
        #[test]
        fn universal_rules_apply_to_every_transaction(ty in "[A-Za-z ]{0,12}", any_case in "(any|ANY|Any|aNy)") {
            let rules = vec![rule(1, &any_case)];
            let t = txn(json!({"transaction_type": ty}));
            prop_assert_eq!(applicable_rules(&t, &rules).len(), 1);
        }

        #[test]
        fn typed_rules_apply_iff_types_match(rule_ty in "[a-z]{1,8}", txn_ty in "[a-zA-Z]{1,8}") {
            prop_assume!(rule_ty != "any" && txn_ty.to_lowercase() != "any");
            let rules = vec![rule(1, &rule_ty)];
            let t = txn(json!({"transaction_type": txn_ty.clone()}));
            let expected = rule_ty == txn_ty.to_lowercase();
            prop_assert_eq!(applicable_rules(&t, &rules).len() == 1, expected);
        }
    }
}
