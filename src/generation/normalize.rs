//! Normalizers turning loosely-typed model output into canonical text sequences.
//!
//! Models are asked for JSON arrays but routinely return a single bulleted or
//! comma-joined string instead. Everything array-shaped goes through
//! [`to_sequence`] before it reaches the schema layer.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

/// Maximum number of hashtags kept by [`to_hashtag_sequence`].
pub const MAX_HASHTAGS: usize = 7;

lazy_static! {
    // "- ", "• ", "* ", "1. ", "2) " at the start of any line.
    static ref LINE_MARKER: Regex = Regex::new(r"(?m)^[ \t]*(?:[-•*]+|\d+[.)])[ \t]*")
        .expect("line marker regex is valid");
    static ref SEPARATORS: Regex =
        Regex::new(r"\r?\n|,|;|\|").expect("separator regex is valid");
}

/// Pre-classified shape of an array-like field.
#[derive(Debug, Clone, PartialEq)]
pub enum TextOrSequence {
    Text(String),
    Sequence(Vec<String>),
    /// Anything else (numbers, objects, null, absent).
    Unsupported,
}

impl From<&Value> for TextOrSequence {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => TextOrSequence::Text(s.clone()),
            Value::Array(items) => {
                TextOrSequence::Sequence(items.iter().filter_map(element_text).collect())
            }
            _ => TextOrSequence::Unsupported,
        }
    }
}

impl From<Option<&Value>> for TextOrSequence {
    fn from(value: Option<&Value>) -> Self {
        value.map(TextOrSequence::from).unwrap_or(TextOrSequence::Unsupported)
    }
}

fn element_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        nested => Some(nested.to_string()),
    }
}

/// Canonical ordered sequence of trimmed, non-empty strings.
pub fn to_sequence(value: impl Into<TextOrSequence>) -> Vec<String> {
    match value.into() {
        TextOrSequence::Sequence(items) => items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        TextOrSequence::Text(text) => {
            let unbulleted = LINE_MARKER.replace_all(&text, "");
            SEPARATORS
                .split(&unbulleted)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }
        TextOrSequence::Unsupported => Vec::new(),
    }
}

/// Lowercase, `#`-free, deduplicated hashtags, at most [`MAX_HASHTAGS`].
pub fn to_hashtag_sequence(value: impl Into<TextOrSequence>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for raw in to_sequence(value) {
        let tag = raw
            .trim_start_matches(|c: char| c == '#' || c.is_whitespace())
            .trim()
            .to_lowercase();
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        tags.push(tag);
        if tags.len() == MAX_HASHTAGS {
            break;
        }
    }
    tags
}
