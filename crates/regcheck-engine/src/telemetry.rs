//! Metric names recorded by the pipeline.
//!
//! Counters go through the `metrics` facade; without an installed recorder
//! they are no-ops. The API binary installs a Prometheus recorder.

/// Rules accepted from extraction.
pub const RULES_EXTRACTED: &str = "regcheck_rules_extracted_total";
/// Decoded rule elements skipped as malformed.
pub const RULES_SKIPPED: &str = "regcheck_rules_skipped_total";
/// Extraction calls that produced no usable output.
pub const EXTRACTION_FAILURES: &str = "regcheck_extraction_failures_total";
/// (transaction, rule) pairs sent to the oracle.
pub const EVALUATIONS: &str = "regcheck_evaluations_total";
/// Pairs whose verdict could not be obtained.
pub const EVALUATION_FAILURES: &str = "regcheck_evaluation_failures_total";
/// Violations reported.
pub const VIOLATIONS: &str = "regcheck_violations_total";

/// Register descriptions for every counter with the installed recorder.
pub fn describe() {
    metrics::describe_counter!(RULES_EXTRACTED, "Rules accepted from oracle extraction");
    metrics::describe_counter!(RULES_SKIPPED, "Extracted rule elements skipped as malformed");
    metrics::describe_counter!(
        EXTRACTION_FAILURES,
        "Rule extractions whose oracle output was unusable"
    );
    metrics::describe_counter!(EVALUATIONS, "Transaction/rule pairs evaluated by the oracle");
    metrics::describe_counter!(
        EVALUATION_FAILURES,
        "Evaluations without a decodable verdict"
    );
    metrics::describe_counter!(VIOLATIONS, "Violations reported");
}
