use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub allowed_origin: Option<String>,

    // Upstreams
    pub catalog: Option<CatalogConfig>,
    pub llm: Option<LlmConfig>,

    /// Style override table, same keys as the `SCRIPT_STYLE_JSON` document.
    pub style: Option<toml::Table>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_sec: Option<u64>,
    pub genre_cache_ttl_hours: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible API root, e.g. "https://api.openai.com/v1"
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
