//! Cineshorts Server Library
//!
//! Movie catalog gateway and LLM-backed script/review generator.
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod config;
pub mod generation;
pub mod llm;
pub mod reviews;
pub mod server;

// Re-export commonly used types for convenience
pub use catalog::{CatalogService, GenreCache, TmdbClient};
pub use generation::{ArtifactGenerator, GenerationError};
pub use llm::{LlmProvider, OpenAIProvider};
pub use server::{run_server, RequestsLoggingLevel};
