//! # Error Hierarchy
//!
//! Structured error types for the rule pipeline, built with `thiserror`.
//!
//! The oracle is an unreliable text channel, so most of these errors are
//! expected in normal operation. They exist to be logged and counted; the
//! pipeline converts every one of them into an empty or negative result.

use thiserror::Error;

/// Top-level error type for regcheck.
#[derive(Error, Debug)]
pub enum RegcheckError {
    /// Oracle output could not be interpreted as the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A decoded rule element lacks required fields.
    #[error("malformed rule: {0}")]
    MalformedRule(#[from] MalformedRuleError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The JSON shape a caller expects to recover from oracle output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A JSON array, e.g. the list of extracted rules.
    Array,
    /// A JSON object, e.g. a single violation verdict.
    Object,
}

impl Shape {
    /// Return the lowercase name of this shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Oracle output could not be turned into structured JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No plausible text encoding could be detected (e.g. empty output).
    #[error("no plausible text encoding detected in {len} bytes")]
    UnknownEncoding {
        /// Number of raw bytes inspected.
        len: usize,
    },

    /// The bytes do not decode cleanly under the detected encoding.
    #[error("output is not valid {encoding}")]
    Malformed {
        /// Name of the encoding that was guessed.
        encoding: String,
    },

    /// No candidate substring parsed as JSON of the expected shape.
    #[error("no JSON {shape} found in oracle output")]
    NoCandidate {
        /// The shape that was searched for.
        shape: Shape,
    },
}

/// A decoded rule element that cannot become a [`crate::Rule`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRuleError {
    /// The element is not a JSON object.
    #[error("rule element {index} is not an object")]
    NotAnObject {
        /// Zero-based position in the decoded array.
        index: usize,
    },

    /// A required field is absent, not a string, or blank.
    #[error("rule element {index} is missing required field \"{field}\"")]
    MissingField {
        /// Zero-based position in the decoded array.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },
}
