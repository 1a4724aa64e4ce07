//! The script/review generation pipeline.
//!
//! Style resolution, prompt rendering, the model call, JSON extraction and
//! schema validation run strictly in that order for every request. The first
//! failing stage ends the pipeline; nothing is retried and no partial
//! artifact is returned.

mod assembler;
mod client;
mod extract;
mod normalize;
mod prompt;
mod schema;
mod style;

use thiserror::Error;

use crate::llm::LlmError;

pub use assembler::{ArtifactGenerator, GenerationRequest};
pub use client::{
    DecodingParams, GenerationClient, REVIEW_DECODING, SCRIPT_DECODING, SYSTEM_INSTRUCTION,
};
pub use extract::{extract_json, MalformedModelOutput};
pub use normalize::{to_hashtag_sequence, to_sequence, TextOrSequence, MAX_HASHTAGS};
pub use prompt::{build_review_prompt, build_script_prompt, GenerationSubject};
pub use schema::{
    validate_review, validate_script, FieldIssue, IssueCode, Ratings, ReviewArtifact,
    ScriptArtifact, ValidationError, HOOK_MAX_CHARS,
};
pub use style::{
    StyleDimension, StyleOverride, StyleParseError, StyleProfile, StyleResolver,
    DEFAULT_NARRATION_WORDS,
};

/// Any failure of the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request itself is unusable.
    #[error("{0}")]
    Input(String),

    /// No provider credential is configured.
    #[error("OPENAI_API_KEY missing")]
    MissingCredential,

    #[error("LLM provider error: {0}")]
    Upstream(#[from] LlmError),

    #[error(transparent)]
    Malformed(#[from] MalformedModelOutput),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl GenerationError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Input(_) => "input",
            GenerationError::MissingCredential => "missing_credential",
            GenerationError::Upstream(_) => "upstream",
            GenerationError::Malformed(_) => "malformed_output",
            GenerationError::Validation(_) => "validation",
        }
    }
}
