//! Artifact assemblers: the only entry points for producing scripts and reviews.

use serde_json::Value;
use tracing::{debug, info};

use super::client::{DecodingParams, GenerationClient, REVIEW_DECODING, SCRIPT_DECODING};
use super::extract::extract_json;
use super::prompt::{build_review_prompt, build_script_prompt, GenerationSubject};
use super::schema::{validate_review, validate_script, ReviewArtifact, ScriptArtifact};
use super::style::{StyleOverride, StyleResolver};
use super::GenerationError;
use crate::server::metrics;

/// A validated inbound generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub subject: GenerationSubject,
    pub style: Option<StyleOverride>,
}

impl GenerationRequest {
    /// Read `{title, year?, overview?, style?}` from a request body.
    ///
    /// `year` may be an integer or a string of digits. A non-string title is
    /// treated as missing.
    pub fn from_json(body: &Value) -> Result<Self, GenerationError> {
        let title = body.get("title").and_then(Value::as_str).unwrap_or_default();
        if title.trim().is_empty() {
            return Err(GenerationError::Input("title required".to_string()));
        }

        let year = match body.get("year") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(
                n.as_i64()
                    .and_then(|y| i32::try_from(y).ok())
                    .ok_or_else(|| GenerationError::Input("year must be an integer".to_string()))?,
            ),
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(
                s.trim()
                    .parse::<i32>()
                    .map_err(|_| GenerationError::Input("year must be an integer".to_string()))?,
            ),
            Some(_) => {
                return Err(GenerationError::Input(
                    "year must be an integer".to_string(),
                ))
            }
        };

        let overview = body
            .get("overview")
            .and_then(Value::as_str)
            .map(str::to_string);

        let style = match body.get("style") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                StyleOverride::from_value(value)
                    .map_err(|_| GenerationError::Input("style must be an object".to_string()))?,
            ),
        };

        Ok(Self {
            subject: GenerationSubject::new(title, year, overview)?,
            style,
        })
    }
}

/// Drives style resolution, prompting, completion, extraction and validation.
#[derive(Clone)]
pub struct ArtifactGenerator {
    client: Option<GenerationClient>,
    style: StyleResolver,
}

impl ArtifactGenerator {
    /// `client` is `None` when no provider credential is configured; every
    /// generation call then fails with [`GenerationError::MissingCredential`].
    pub fn new(client: Option<GenerationClient>, style: StyleResolver) -> Self {
        Self { client, style }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn generate_script(
        &self,
        request: &GenerationRequest,
    ) -> Result<ScriptArtifact, GenerationError> {
        let result = self.script(request).await;
        metrics::record_generation("script", outcome_label(&result));
        result
    }

    pub async fn generate_review(
        &self,
        request: &GenerationRequest,
    ) -> Result<ReviewArtifact, GenerationError> {
        let result = self.review(request).await;
        metrics::record_generation("review", outcome_label(&result));
        result
    }

    async fn script(&self, request: &GenerationRequest) -> Result<ScriptArtifact, GenerationError> {
        let client = self.client()?;
        let style_text = self.style.resolve(request.style.as_ref()).to_text();
        let prompt = build_script_prompt(&request.subject, &style_text);

        let output = self.run(client, &prompt, SCRIPT_DECODING).await?;
        let script = validate_script(&output, request.subject.title())?;
        info!(
            title = request.subject.title(),
            beats = script.beats.len(),
            hashtags = script.hashtags.len(),
            "Generated script"
        );
        Ok(script)
    }

    async fn review(&self, request: &GenerationRequest) -> Result<ReviewArtifact, GenerationError> {
        let client = self.client()?;
        let style_text = self.style.resolve(request.style.as_ref()).to_text();
        let narration_words = self.style.narration_words(request.style.as_ref());
        let prompt = build_review_prompt(&request.subject, &style_text, narration_words);

        let output = self.run(client, &prompt, REVIEW_DECODING).await?;
        let review = validate_review(&output, request.subject.title())?;
        info!(
            title = request.subject.title(),
            overall = review.ratings.overall,
            "Generated review"
        );
        Ok(review)
    }

    async fn run(
        &self,
        client: &GenerationClient,
        prompt: &str,
        params: DecodingParams,
    ) -> Result<Value, GenerationError> {
        debug!(
            provider = client.provider_name(),
            prompt_length = prompt.len(),
            "Requesting completion"
        );
        let raw = client.complete(prompt, params).await?;
        Ok(extract_json(&raw)?)
    }

    fn client(&self) -> Result<&GenerationClient, GenerationError> {
        self.client.as_ref().ok_or(GenerationError::MissingCredential)
    }
}

fn outcome_label<T>(result: &Result<T, GenerationError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_requires_title() {
        for body in [json!({}), json!({"title": "  "}), json!({"title": 42})] {
            let err = GenerationRequest::from_json(&body).unwrap_err();
            assert!(matches!(err, GenerationError::Input(ref m) if m == "title required"));
        }
    }

    #[test]
    fn request_accepts_numeric_string_year() {
        let request =
            GenerationRequest::from_json(&json!({"title": "Test Movie", "year": "2024"})).unwrap();
        assert_eq!(request.subject.year, Some(2024));

        let request =
            GenerationRequest::from_json(&json!({"title": "Test Movie", "year": 2019})).unwrap();
        assert_eq!(request.subject.year, Some(2019));
    }

    #[test]
    fn request_rejects_bad_year_and_style() {
        let err =
            GenerationRequest::from_json(&json!({"title": "T", "year": "soon"})).unwrap_err();
        assert!(matches!(err, GenerationError::Input(ref m) if m == "year must be an integer"));

        let err = GenerationRequest::from_json(&json!({"title": "T", "style": "loud"})).unwrap_err();
        assert!(matches!(err, GenerationError::Input(ref m) if m == "style must be an object"));
    }

    #[test]
    fn request_carries_style_and_overview() {
        let request = GenerationRequest::from_json(&json!({
            "title": "T",
            "overview": "A heist.",
            "style": {"tone": "chill", "narrationWords": 300}
        }))
        .unwrap();
        assert_eq!(request.subject.overview.as_deref(), Some("A heist."));
        let style = request.style.unwrap();
        assert!(!style.is_empty());
        assert_eq!(style.narration_words(), Some(300));
    }

    #[tokio::test]
    async fn missing_client_fails_with_missing_credential() {
        let generator = ArtifactGenerator::new(None, StyleResolver::default());
        assert!(!generator.is_configured());
        let request = GenerationRequest::from_json(&json!({"title": "T"})).unwrap();
        let err = generator.generate_script(&request).await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredential));
    }
}
