//! Style profile resolution.
//!
//! A [`StyleProfile`] is built by layering overrides on top of built-in
//! defaults: defaults < environment override < per-request override.

use serde_json::{Map, Value};
use thiserror::Error;

/// Narration length used when the request doesn't ask for one.
pub const DEFAULT_NARRATION_WORDS: u32 = 260;

/// The named dimensions of a style profile, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleDimension {
    Persona,
    Tone,
    Slang,
    Pace,
    Devices,
    Emoji,
    Address,
    CtaStyle,
    HashtagsStyle,
}

impl StyleDimension {
    pub const ALL: [StyleDimension; 9] = [
        StyleDimension::Persona,
        StyleDimension::Tone,
        StyleDimension::Slang,
        StyleDimension::Pace,
        StyleDimension::Devices,
        StyleDimension::Emoji,
        StyleDimension::Address,
        StyleDimension::CtaStyle,
        StyleDimension::HashtagsStyle,
    ];

    /// JSON key used in override documents.
    pub fn key(&self) -> &'static str {
        match self {
            StyleDimension::Persona => "persona",
            StyleDimension::Tone => "tone",
            StyleDimension::Slang => "slang",
            StyleDimension::Pace => "pace",
            StyleDimension::Devices => "devices",
            StyleDimension::Emoji => "emoji",
            StyleDimension::Address => "address",
            StyleDimension::CtaStyle => "ctaStyle",
            StyleDimension::HashtagsStyle => "hashtagsStyle",
        }
    }

    /// Label used in the rendered style block.
    pub fn label(&self) -> &'static str {
        match self {
            StyleDimension::Persona => "Persona",
            StyleDimension::Tone => "Tone",
            StyleDimension::Slang => "Slang",
            StyleDimension::Pace => "Pace",
            StyleDimension::Devices => "Devices",
            StyleDimension::Emoji => "Emoji",
            StyleDimension::Address => "Address",
            StyleDimension::CtaStyle => "CTA Style",
            StyleDimension::HashtagsStyle => "Hashtags Style",
        }
    }
}

/// Fully resolved voice/tone parameters for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleProfile {
    pub persona: String,
    pub tone: String,
    pub slang: String,
    pub pace: String,
    pub devices: String,
    pub emoji: String,
    pub address: String,
    pub cta_style: String,
    pub hashtags_style: String,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            persona: "Energetic, street-smart Hinglish — witty, confident, desi-Mumbai vibe"
                .to_string(),
            tone: "mast & attractive; crisp lines; no cringe; no over-explaining".to_string(),
            slang: "light Hindi/Mumbai slang only (bhai, yaar, scene, mast) — keep it natural"
                .to_string(),
            pace: "fast, punchy; 150–170 wpm; micro-pauses implied".to_string(),
            devices: "rhetorical questions, contrast, quick twists, wordplay".to_string(),
            emoji: "0–2 total, max; avoid spam".to_string(),
            address: "second-person (tum/you) direct camera address".to_string(),
            cta_style:
                "Short, hype, imperative. Ask to follow/subscribe for more movie shorts in Hinglish"
                    .to_string(),
            hashtags_style:
                "5–7; mix of English/Hinglish; all lowercase; no spaces; no movie-title duplicates"
                    .to_string(),
        }
    }
}

impl StyleProfile {
    pub fn get(&self, dimension: StyleDimension) -> &str {
        match dimension {
            StyleDimension::Persona => &self.persona,
            StyleDimension::Tone => &self.tone,
            StyleDimension::Slang => &self.slang,
            StyleDimension::Pace => &self.pace,
            StyleDimension::Devices => &self.devices,
            StyleDimension::Emoji => &self.emoji,
            StyleDimension::Address => &self.address,
            StyleDimension::CtaStyle => &self.cta_style,
            StyleDimension::HashtagsStyle => &self.hashtags_style,
        }
    }

    fn slot_mut(&mut self, dimension: StyleDimension) -> &mut String {
        match dimension {
            StyleDimension::Persona => &mut self.persona,
            StyleDimension::Tone => &mut self.tone,
            StyleDimension::Slang => &mut self.slang,
            StyleDimension::Pace => &mut self.pace,
            StyleDimension::Devices => &mut self.devices,
            StyleDimension::Emoji => &mut self.emoji,
            StyleDimension::Address => &mut self.address,
            StyleDimension::CtaStyle => &mut self.cta_style,
            StyleDimension::HashtagsStyle => &mut self.hashtags_style,
        }
    }

    /// Overwrite the dimensions the override sets, leaving the rest alone.
    pub fn apply(&mut self, layer: &StyleOverride) {
        for (dimension, value) in &layer.values {
            *self.slot_mut(*dimension) = value.clone();
        }
    }

    /// One `Label: value` line per dimension, in [`StyleDimension::ALL`] order.
    pub fn to_text(&self) -> String {
        StyleDimension::ALL
            .iter()
            .map(|d| format!("{}: {}", d.label(), self.get(*d)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StyleParseError {
    #[error("style override is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("style override must be a JSON object")]
    NotAnObject,
}

/// A partial style profile, as supplied by the environment or a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverride {
    values: Vec<(StyleDimension, String)>,
    narration_words: Option<u32>,
}

impl StyleOverride {
    /// Parse an override document (e.g. the `SCRIPT_STYLE_JSON` variable).
    pub fn parse(text: &str) -> Result<Self, StyleParseError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| StyleParseError::InvalidJson(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Build an override from an already-parsed JSON value.
    ///
    /// Scalar values are taken as text; nulls, arrays and nested objects are
    /// skipped. Keys that aren't style dimensions are ignored.
    pub fn from_value(value: &Value) -> Result<Self, StyleParseError> {
        let object = value.as_object().ok_or(StyleParseError::NotAnObject)?;
        Ok(Self {
            values: StyleDimension::ALL
                .iter()
                .filter_map(|d| scalar_text(object, d.key()).map(|v| (*d, v)))
                .collect(),
            narration_words: narration_words(object),
        })
    }

    pub fn with(mut self, dimension: StyleDimension, value: impl Into<String>) -> Self {
        self.values.retain(|(d, _)| *d != dimension);
        self.values.push((dimension, value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.narration_words.is_none()
    }

    pub fn narration_words(&self) -> Option<u32> {
        self.narration_words
    }
}

fn scalar_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn narration_words(object: &Map<String, Value>) -> Option<u32> {
    let words = match object.get("narrationWords")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if words.is_finite() && words >= 1.0 {
        Some(words.min(u32::MAX as f64) as u32)
    } else {
        None
    }
}

/// Layers the process-wide override under each request's override.
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    environment: Option<StyleOverride>,
}

impl StyleResolver {
    pub fn new(environment: Option<StyleOverride>) -> Self {
        Self { environment }
    }

    pub fn resolve(&self, request: Option<&StyleOverride>) -> StyleProfile {
        let mut profile = StyleProfile::default();
        if let Some(environment) = &self.environment {
            profile.apply(environment);
        }
        if let Some(request) = request {
            profile.apply(request);
        }
        profile
    }

    /// Word target for review narration; only the request can change it.
    pub fn narration_words(&self, request: Option<&StyleOverride>) -> u32 {
        request
            .and_then(StyleOverride::narration_words)
            .unwrap_or(DEFAULT_NARRATION_WORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_tone_only_changes_tone() {
        let resolver = StyleResolver::default();
        let request = StyleOverride::from_value(&json!({"tone": "chill"})).unwrap();

        let resolved = resolver.resolve(Some(&request));
        let expected = StyleProfile {
            tone: "chill".to_string(),
            ..StyleProfile::default()
        };
        assert_eq!(resolved, expected);
    }

    #[test]
    fn request_overrides_environment() {
        let env = StyleOverride::parse(r#"{"tone": "env tone", "pace": "slow"}"#).unwrap();
        let resolver = StyleResolver::new(Some(env));
        let request = StyleOverride::default().with(StyleDimension::Tone, "request tone");

        let resolved = resolver.resolve(Some(&request));
        assert_eq!(resolved.tone, "request tone");
        assert_eq!(resolved.pace, "slow");
        assert_eq!(resolved.persona, StyleProfile::default().persona);
    }

    #[test]
    fn parse_rejects_bad_documents() {
        assert!(matches!(
            StyleOverride::parse("{not json"),
            Err(StyleParseError::InvalidJson(_))
        ));
        assert_eq!(
            StyleOverride::parse("[1, 2]"),
            Err(StyleParseError::NotAnObject)
        );
    }

    #[test]
    fn unknown_keys_and_non_scalars_are_ignored() {
        let layer = StyleOverride::from_value(&json!({
            "mood": "happy",
            "tone": {"nested": true},
            "emoji": null,
            "slang": 0,
        }))
        .unwrap();
        let mut profile = StyleProfile::default();
        profile.apply(&layer);
        assert_eq!(profile.tone, StyleProfile::default().tone);
        assert_eq!(profile.emoji, StyleProfile::default().emoji);
        assert_eq!(profile.slang, "0");
    }

    #[test]
    fn text_block_has_fixed_order() {
        let text = StyleProfile::default().to_text();
        let labels: Vec<&str> = text
            .lines()
            .map(|l| l.split(':').next().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Persona",
                "Tone",
                "Slang",
                "Pace",
                "Devices",
                "Emoji",
                "Address",
                "CTA Style",
                "Hashtags Style"
            ]
        );
    }

    #[test]
    fn narration_words_from_request() {
        let resolver = StyleResolver::default();
        assert_eq!(resolver.narration_words(None), DEFAULT_NARRATION_WORDS);

        let numeric = StyleOverride::from_value(&json!({"narrationWords": 320})).unwrap();
        assert_eq!(resolver.narration_words(Some(&numeric)), 320);

        let text = StyleOverride::from_value(&json!({"narrationWords": "180"})).unwrap();
        assert_eq!(resolver.narration_words(Some(&text)), 180);

        let zero = StyleOverride::from_value(&json!({"narrationWords": 0})).unwrap();
        assert_eq!(resolver.narration_words(Some(&zero)), DEFAULT_NARRATION_WORDS);
    }
}
