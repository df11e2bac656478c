//! # Prompt Templates
//!
//! Plain-text templates sent to the oracle. Placeholders are `{document}`
//! in the extraction template and `{transaction}` / `{rule}` in the
//! evaluation template. Any other brace text (such as the JSON answer
//! format shown to the model) is left alone.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use regcheck_core::{Rule, Transaction};

const DEFAULT_EXTRACTION: &str = "\
You are an AI assistant extracting rules from a regulatory document.
Return a JSON list of rules. Each rule should have:
- id (number)
- transaction_type (e.g., mortgage, auto, etc. or \"any\")
- description (human-readable)
- condition (logical check in plain English)

RULE TEXT:
{document}
";

const DEFAULT_EVALUATION: &str = "\
Given the following transaction:
{transaction}

and the rule:
{rule}

Does this transaction violate the rule? Answer YES or NO and provide a reason and a remediation.
Return this in JSON:
{\"violation\": true/false, \"reason\": \"...\", \"remediation\": \"...\"}
";

/// Placeholder names understood by [`render`].
pub const DOCUMENT: &str = "document";
/// See [`DOCUMENT`].
pub const TRANSACTION: &str = "transaction";
/// See [`DOCUMENT`].
pub const RULE: &str = "rule";

/// The pair of templates used by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    /// Rule extraction prompt; must contain `{document}`.
    pub extraction: String,
    /// Per-pair evaluation prompt; must contain `{transaction}` and `{rule}`.
    pub evaluation: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            extraction: DEFAULT_EXTRACTION.to_string(),
            evaluation: DEFAULT_EVALUATION.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Extraction prompt for a document's text.
    pub fn extraction_prompt(&self, document: &str) -> String {
        render(&self.extraction, &[(DOCUMENT, document)])
    }

    /// Evaluation prompt for one transaction and one rule.
    pub fn evaluation_prompt(&self, transaction: &Transaction, rule: &Rule) -> String {
        let transaction = pretty(&transaction.fields);
        let rule = pretty(rule);
        render(
            &self.evaluation,
            &[(TRANSACTION, transaction.as_str()), (RULE, rule.as_str())],
        )
    }

    /// Names of required placeholders missing from either template.
    pub fn missing_placeholders(&self) -> Vec<String> {
        let mut missing = Vec::new();
        let mut require = |template: &str, which: &str, name: &str| {
            if !template.contains(&format!("{{{name}}}")) {
                missing.push(format!("{which}.{{{name}}}"));
            }
        };
        require(&self.extraction, "extraction", DOCUMENT);
        require(&self.evaluation, "evaluation", TRANSACTION);
        require(&self.evaluation, "evaluation", RULE);
        missing
    }
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| Value::Null.to_string())
}

/// Substitute `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so a document that itself
/// contains `{rule}` is embedded verbatim.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
