//! Artifact schemas: turning an extracted JSON object into a typed artifact.
//!
//! Array-shaped fields are coerced through the normalizers and never fail.
//! Text fields accept strings and scalars; a nested object or array where text
//! is expected is a validation issue. Issues are collected for every field
//! before failing, so the caller sees the whole picture at once.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::normalize::{to_hashtag_sequence, to_sequence};

/// Maximum hook length, in characters.
pub const HOOK_MAX_CHARS: usize = 80;
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptArtifact {
    pub title: String,
    pub hook: String,
    pub fact: String,
    pub cta: String,
    pub beats: Vec<String>,
    pub scenes: Vec<String>,
    pub captions: Vec<String>,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewArtifact {
    pub title: String,
    pub one_liner: String,
    pub summary: String,
    pub plot_theme: String,
    pub what_works: Vec<String>,
    pub what_doesnt: Vec<String>,
    pub best_scenes: Vec<String>,
    pub performances: String,
    pub writing_direction: String,
    pub action_technical: String,
    pub music_vfx: String,
    pub pace_tone: String,
    pub family_guide: String,
    pub who_should_watch: Vec<String>,
    pub who_should_skip: Vec<String>,
    pub ratings: Ratings,
    pub verdict: String,
    pub narration: String,
}

/// Seven scores, each within [`RATING_MIN`]..=[`RATING_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ratings {
    pub overall: f64,
    pub story: f64,
    pub acting: f64,
    pub direction: f64,
    pub action: f64,
    pub music: f64,
    pub vfx: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    TooBig,
    TooSmall,
}

/// One schema violation, located by its JSON path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub code: IssueCode,
    pub path: Vec<String>,
    pub message: String,
}

#[derive(Debug, Error, PartialEq)]
#[error("model output failed validation: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.path.join("."), i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

const RATING_KEYS: [&str; 7] = [
    "overall",
    "story",
    "acting",
    "direction",
    "action",
    "music",
    "vfx",
];

/// Validate model output as a script. `title` always wins over the model's.
pub fn validate_script(output: &Value, title: &str) -> Result<ScriptArtifact, ValidationError> {
    let mut reader = FieldReader::new(output)?;

    let hook = reader.text_or_default("hook");
    reader.check_max_chars("hook", &hook, HOOK_MAX_CHARS);

    let artifact = ScriptArtifact {
        title: title.to_string(),
        hook,
        fact: reader.text_or_default("fact"),
        cta: reader.text_or_default("cta"),
        beats: to_sequence(reader.get("beats")),
        scenes: to_sequence(reader.get("scenes")),
        captions: to_sequence(reader.get("captions")),
        hashtags: to_hashtag_sequence(reader.get("hashtags")),
    };
    reader.finish(artifact)
}

/// Validate model output as a review. `title` always wins over the model's.
pub fn validate_review(output: &Value, title: &str) -> Result<ReviewArtifact, ValidationError> {
    let mut reader = FieldReader::new(output)?;

    let artifact = ReviewArtifact {
        title: title.to_string(),
        one_liner: reader.required_text("oneLiner"),
        summary: reader.required_text("summary"),
        plot_theme: reader.text_or_default("plotTheme"),
        what_works: reader.required_sequence("whatWorks"),
        what_doesnt: reader.required_sequence("whatDoesnt"),
        best_scenes: reader.required_sequence("bestScenes"),
        performances: reader.required_text("performances"),
        writing_direction: reader.required_text("writingDirection"),
        action_technical: reader.required_text("actionTechnical"),
        music_vfx: reader.required_text("musicVfx"),
        pace_tone: reader.required_text("paceTone"),
        family_guide: reader.required_text("familyGuide"),
        who_should_watch: reader.required_sequence("whoShouldWatch"),
        who_should_skip: reader.required_sequence("whoShouldSkip"),
        ratings: reader.ratings(),
        verdict: reader.required_text("verdict"),
        narration: reader.required_text("narration"),
    };
    reader.finish(artifact)
}

struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    issues: Vec<FieldIssue>,
}

impl<'a> FieldReader<'a> {
    fn new(output: &'a Value) -> Result<Self, ValidationError> {
        match output.as_object() {
            Some(object) => Ok(Self {
                object,
                issues: Vec::new(),
            }),
            None => Err(ValidationError {
                issues: vec![FieldIssue {
                    code: IssueCode::InvalidType,
                    path: Vec::new(),
                    message: "Expected object".to_string(),
                }],
            }),
        }
    }

    /// Present and non-null value for `key`.
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|v| !v.is_null())
    }

    fn issue(&mut self, path: &[&str], code: IssueCode, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            code,
            path: path.iter().map(|p| p.to_string()).collect(),
            message: message.into(),
        });
    }

    fn text(&mut self, key: &str, required: bool) -> String {
        match self.get(key) {
            None if required => {
                self.issue(&[key], IssueCode::InvalidType, "Required");
                String::new()
            }
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(other) => {
                let message = format!("Expected string, received {}", type_name(other));
                self.issue(&[key], IssueCode::InvalidType, message);
                String::new()
            }
        }
    }

    fn text_or_default(&mut self, key: &str) -> String {
        self.text(key, false)
    }

    fn required_text(&mut self, key: &str) -> String {
        self.text(key, true)
    }

    fn required_sequence(&mut self, key: &str) -> Vec<String> {
        if !self.object.contains_key(key) {
            self.issue(&[key], IssueCode::InvalidType, "Required");
        }
        to_sequence(self.get(key))
    }

    fn check_max_chars(&mut self, key: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            let message = format!("String must contain at most {} character(s)", max);
            self.issue(&[key], IssueCode::TooBig, message);
        }
    }

    fn ratings(&mut self) -> Ratings {
        let object = match self.get("ratings") {
            Some(Value::Object(object)) => Some(object),
            Some(other) => {
                let message = format!("Expected object, received {}", type_name(other));
                self.issue(&["ratings"], IssueCode::InvalidType, message);
                None
            }
            None => {
                self.issue(&["ratings"], IssueCode::InvalidType, "Required");
                None
            }
        };

        let mut scores = [0.0; 7];
        if let Some(object) = object {
            for (slot, key) in scores.iter_mut().zip(RATING_KEYS) {
                *slot = self.rating(object, key);
            }
        }
        let [overall, story, acting, direction, action, music, vfx] = scores;
        Ratings {
            overall,
            story,
            acting,
            direction,
            action,
            music,
            vfx,
        }
    }

    fn rating(&mut self, ratings: &Map<String, Value>, key: &str) -> f64 {
        let path = ["ratings", key];
        let raw = match ratings.get(key).filter(|v| !v.is_null()) {
            Some(raw) => raw,
            None => {
                self.issue(&path, IssueCode::InvalidType, "Required");
                return 0.0;
            }
        };
        let Some(score) = coerce_number(raw) else {
            let message = format!("Expected number, received {}", type_name(raw));
            self.issue(&path, IssueCode::InvalidType, message);
            return 0.0;
        };
        if score < RATING_MIN {
            self.issue(
                &path,
                IssueCode::TooSmall,
                format!("Number must be greater than or equal to {}", RATING_MIN),
            );
        } else if score > RATING_MAX {
            self.issue(
                &path,
                IssueCode::TooBig,
                format!("Number must be less than or equal to {}", RATING_MAX),
            );
        }
        score
    }

    fn finish<T>(self, artifact: T) -> Result<T, ValidationError> {
        if self.issues.is_empty() {
            Ok(artifact)
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
