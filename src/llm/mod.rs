//! LLM provider abstraction layer.
//!
//! This module provides a trait-based abstraction for LLM providers, so the
//! generation pipeline can run against any OpenAI-compatible backend (or a
//! fake one in tests).

mod openai;
mod provider;
mod types;

pub use openai::OpenAIProvider;
pub use provider::{CompletionOptions, LlmError, LlmProvider};
#[cfg(feature = "mock")]
pub use provider::MockLlmProvider;
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage};
