//! Single-shot completion calls against the configured LLM provider.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::llm::{CompletionOptions, FinishReason, LlmError, LlmProvider, Message};

/// Instruction sent as the system message of every generation call.
pub const SYSTEM_INSTRUCTION: &str = "Return pure JSON. No prose, no code fences.";

/// Returned in place of an empty completion.
const EMPTY_COMPLETION: &str = "{}";

/// Fixed decoding parameters for one artifact kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodingParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

pub const SCRIPT_DECODING: DecodingParams = DecodingParams {
    temperature: 0.8,
    max_tokens: 900,
};

pub const REVIEW_DECODING: DecodingParams = DecodingParams {
    temperature: 0.7,
    max_tokens: 1100,
};

#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one completion and return the raw response text.
    pub async fn complete(&self, prompt: &str, params: DecodingParams) -> Result<String, LlmError> {
        let messages = [Message::system(SYSTEM_INSTRUCTION), Message::user(prompt)];
        let options = CompletionOptions {
            temperature: params.temperature,
            max_tokens: Some(params.max_tokens),
            timeout: self.timeout,
        };

        let start = Instant::now();
        let result = self.provider.complete(&messages, &options).await;
        crate::server::metrics::record_upstream_call(
            "llm",
            result.is_ok(),
            start.elapsed(),
        );
        let response = result?;

        if response.finish_reason == FinishReason::MaxTokens {
            warn!(
                provider = self.provider.name(),
                model = self.provider.model(),
                max_tokens = params.max_tokens,
                "Completion truncated by token ceiling"
            );
        }
        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion token usage"
            );
        }

        let text = response.message.content.trim();
        if text.is_empty() {
            Ok(EMPTY_COMPLETION.to_string())
        } else {
            Ok(text.to_string())
        }
    }
}
