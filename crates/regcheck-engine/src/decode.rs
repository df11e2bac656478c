//! # Response Decoder
//!
//! Recovers a JSON value from raw oracle output. The oracle is asked for
//! JSON but answers in free text: preambles, trailing commentary, markdown
//! fences, echoed templates, and occasionally a non-UTF-8 byte stream.
//!
//! ## Encoding
//!
//! A byte-order mark wins. Otherwise valid UTF-8 is taken as UTF-8, and
//! anything else goes through `chardetng` detection and `encoding_rs`
//! decoding. Empty output, or output that does not decode cleanly under the
//! guessed encoding, is a [`DecodeError`].
//!
//! ## Accepted shapes
//!
//! Candidates are tried in a fixed priority order:
//!
//! | Priority | [`Shape::Array`] (rule lists)          | [`Shape::Object`] (verdicts)            |
//! |----------|----------------------------------------|-----------------------------------------|
//! | 1        | fenced code blocks                     | fenced code block                       |
//! | 2        | bracket-balanced `[...]` spans         | last non-empty line                     |
//! | 3        | last non-empty line                    | last brace-balanced top-level `{...}`   |
//!
//! For objects the first candidate that parses wins. For arrays the first
//! candidate holding at least one object wins, so prose such as
//! "see section [1]" or "otherwise return []" ahead of the rule list is
//! passed over. When no candidate holds an object, the first array found
//! is returned.
//!
//! Balanced spans are found by scanning from every opening delimiter and
//! tracking nesting depth outside JSON string literals, so brackets inside
//! strings and nested arrays do not end a span early.

use std::sync::OnceLock;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use serde_json::Value;

use regcheck_core::{DecodeError, Shape};

/// Oracle output decoded to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// The decoded text.
    pub text: String,
    /// Name of the encoding used.
    pub encoding: &'static str,
}

/// Decode raw oracle output and recover a JSON value of the given shape.
///
/// Returns `None` on any failure; the cause is logged at `debug`.
pub fn decode(raw: &[u8], shape: Shape) -> Option<Value> {
    match try_decode(raw, shape) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, bytes = raw.len(), %shape, "oracle output not decodable");
            None
        }
    }
}

/// Decode raw oracle output and recover a JSON value of the given shape.
pub fn try_decode(raw: &[u8], shape: Shape) -> Result<Value, DecodeError> {
    let decoded = decode_text(raw)?;
    tracing::debug!(
        bytes = raw.len(),
        encoding = decoded.encoding,
        text = %decoded.text,
        "decoded oracle output"
    );
    parse_text(&decoded.text, shape)
}

/// Detect the encoding of `raw` and decode it to text.
pub fn decode_text(raw: &[u8]) -> Result<DecodedText, DecodeError> {
    if raw.is_empty() {
        return Err(DecodeError::UnknownEncoding { len: 0 });
    }

    if let Some((encoding, bom_len)) = Encoding::for_bom(raw) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&raw[bom_len..]);
        return finish(text.into_owned(), encoding, had_errors);
    }

    if let Ok(text) = std::str::from_utf8(raw) {
        return Ok(DecodedText {
            text: text.to_owned(),
            encoding: UTF_8.name(),
        });
    }

    let mut detector = EncodingDetector::new();
    detector.feed(raw, true);
    let encoding = detector.guess(None, true);
    let (text, used, had_errors) = encoding.decode(raw);
    finish(text.into_owned(), used, had_errors)
}

fn finish(
    text: String,
    encoding: &'static Encoding,
    had_errors: bool,
) -> Result<DecodedText, DecodeError> {
    if had_errors {
        return Err(DecodeError::Malformed {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(DecodedText {
        text,
        encoding: encoding.name(),
    })
}

/// Recover a JSON value of the given shape from already-decoded text.
pub fn parse_text(text: &str, shape: Shape) -> Result<Value, DecodeError> {
    let found = match shape {
        Shape::Array => first_rule_list(array_candidates(text)),
        Shape::Object => fenced_values(text, shape)
            .next()
            .or_else(|| last_line(text, shape))
            .or_else(|| balanced_values(text, shape).last()),
    };
    found.ok_or(DecodeError::NoCandidate { shape })
}

/// Every array candidate in priority order, produced lazily.
fn array_candidates(text: &str) -> impl Iterator<Item = Value> + '_ {
    fenced_values(text, Shape::Array)
        .chain(balanced_values(text, Shape::Array))
        .chain(std::iter::once_with(move || last_line(text, Shape::Array)).flatten())
}

/// The first candidate holding an object, else the first candidate.
fn first_rule_list(candidates: impl Iterator<Item = Value>) -> Option<Value> {
    let mut fallback = None;
    for value in candidates {
        if holds_object(&value) {
            return Some(value);
        }
        fallback.get_or_insert(value);
    }
    fallback
}

fn holds_object(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().any(Value::is_object))
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_-]*[^\S\n]*\n?(.*?)```").unwrap_or_else(|e| {
            unreachable!("fence pattern is a valid regex: {e}")
        })
    })
}

/// Values in markdown code fences: each body whole, else its balanced spans.
fn fenced_values(text: &str, shape: Shape) -> impl Iterator<Item = Value> + '_ {
    fence_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .flat_map(move |body| {
            let body = body.as_str();
            match parse_as(body, shape) {
                Some(value) => vec![value],
                None => balanced_values(body, shape).collect(),
            }
        })
}

fn last_line(text: &str, shape: Shape) -> Option<Value> {
    text.lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| parse_as(line, shape))
}

fn parse_as(candidate: &str, shape: Shape) -> Option<Value> {
    let value: Value = serde_json::from_str(candidate.trim()).ok()?;
    let matches = match shape {
        Shape::Array => value.is_array(),
        Shape::Object => value.is_object(),
    };
    matches.then_some(value)
}

/// Top-level balanced spans of `shape` that parse, left to right.
///
/// Once a span parses, scanning resumes after it, so nested values of the
/// same shape are not yielded separately.
fn balanced_values(text: &str, shape: Shape) -> impl Iterator<Item = Value> + '_ {
    let (open, close) = match shape {
        Shape::Array => (b'[', b']'),
        Shape::Object => (b'{', b'}'),
    };
    let bytes = text.as_bytes();
    let mut cursor = 0;
    std::iter::from_fn(move || {
        while cursor < bytes.len() {
            let start = cursor + bytes[cursor..].iter().position(|&b| b == open)?;
            cursor = start + 1;
            let Some(end) = matching_close(bytes, start, open, close) else {
                continue;
            };
            // Delimiters are ASCII, so both ends are char boundaries.
            if let Some(value) = parse_as(&text[start..=end], shape) {
                cursor = end + 1;
                return Some(value);
            }
        }
        None
    })
}

/// Index of the delimiter closing the one at `start`, skipping string literals.
fn matching_close(bytes: &[u8], start: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            _ if b == open => depth += 1,
            _ if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}
