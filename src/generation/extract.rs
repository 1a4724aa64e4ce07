//! Recovering a JSON object from free-form model output.
//!
//! Models asked for "JSON only" still wrap answers in markdown fences or add
//! a line of commentary. Extraction is tolerant of both, and fails with a
//! typed error only when no object can be recovered at all.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

lazy_static! {
    static ref FENCE: Regex = Regex::new(r"(?i)```(?:json)?").expect("fence regex is valid");
}

/// The model's response contained no recoverable JSON object.
#[derive(Debug, Error, PartialEq)]
#[error("Invalid JSON returned by model")]
pub struct MalformedModelOutput {
    /// Length of the raw response, for logs.
    pub raw_length: usize,
}

/// Extract the JSON object from a raw model response.
///
/// Tries, in order: the fence-stripped text as a whole, then the slice from
/// the first `{` to the last `}`.
pub fn extract_json(raw: &str) -> Result<Value, MalformedModelOutput> {
    let cleaned = FENCE.replace_all(raw, "");
    let cleaned = cleaned.trim();

    if let Some(object) = parse_object(cleaned) {
        return Ok(object);
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if end > start {
            if let Some(object) = parse_object(&cleaned[start..=end]) {
                return Ok(object);
            }
        }
    }

    tracing::warn!(
        response_length = raw.len(),
        "No JSON object found in model response"
    );
    Err(MalformedModelOutput {
        raw_length: raw.len(),
    })
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}
