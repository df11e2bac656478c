//! # Rule Extractor
//!
//! Turns a regulatory document into structured [`Rule`]s with one oracle
//! call. The call is expected to fail or to return junk some of the time;
//! that is never an error to the caller. An unusable reply yields an empty
//! rule set, and the reason is kept on the [`Extraction`] for stats and logs.

use serde_json::Value;

use regcheck_core::{Rule, Shape};

use crate::decode::try_decode;
use crate::invoke::Invoker;
use crate::prompt::PromptTemplates;
use crate::telemetry;

/// Outcome of one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Accepted rules, ids 1..n in extraction order.
    pub rules: Vec<Rule>,
    /// Decoded elements dropped as malformed.
    pub skipped: usize,
    /// Why the call produced nothing usable, if it did not.
    pub failure: Option<String>,
}

impl Extraction {
    fn failed(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Derives rules from document text via the oracle.
#[derive(Debug, Clone)]
pub struct RuleExtractor {
    invoker: Invoker,
    templates: PromptTemplates,
}

impl RuleExtractor {
    /// Create an extractor using `templates.extraction`.
    pub fn new(invoker: Invoker, templates: PromptTemplates) -> Self {
        Self { invoker, templates }
    }

    /// Ask the oracle for the rules in `document` and parse what comes back.
    pub async fn extract_rules(&self, document: &str) -> Extraction {
        let prompt = self.templates.extraction_prompt(document);

        let extraction = match self.invoker.call(&prompt).await {
            Err(e) => {
                tracing::warn!(
                    oracle = self.invoker.oracle_name(),
                    error = %e,
                    "rule extraction call failed"
                );
                Extraction::failed(e.to_string())
            }
            Ok(raw) => match try_decode(&raw, Shape::Array) {
                Ok(value) => rules_from_value(&value),
                Err(e) => {
                    tracing::warn!(error = %e, bytes = raw.len(), "rule extraction output not decodable");
                    Extraction::failed(e.to_string())
                }
            },
        };

        if extraction.failure.is_some() {
            metrics::counter!(telemetry::EXTRACTION_FAILURES).increment(1);
        }
        metrics::counter!(telemetry::RULES_EXTRACTED).increment(extraction.rules.len() as u64);
        metrics::counter!(telemetry::RULES_SKIPPED).increment(extraction.skipped as u64);

        let rules_extracted = extraction.rules.len();
        if rules_extracted == 0 {
            tracing::warn!(
                rules_extracted,
                skipped = extraction.skipped,
                "no rules extracted; every transaction will pass"
            );
        } else {
            tracing::info!(rules_extracted, skipped = extraction.skipped, "rules extracted");
        }
        extraction
    }
}

/// Map a decoded JSON array onto rules, skipping malformed elements.
///
/// Ids are assigned 1..n over the accepted elements. A non-array value is
/// treated as an empty list.
pub fn rules_from_value(value: &Value) -> Extraction {
    let elements = value.as_array().map(Vec::as_slice).unwrap_or_default();
    let mut extraction = Extraction::default();
    for (index, element) in elements.iter().enumerate() {
        let id = extraction.rules.len() as u64 + 1;
        match Rule::from_value(index, id, element) {
            Ok(rule) => extraction.rules.push(rule),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed rule");
                extraction.skipped += 1;
            }
        }
    }
    extraction
}
