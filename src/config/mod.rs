mod file_config;

pub use file_config::{CatalogConfig, FileConfig, LlmConfig};

use crate::generation::StyleOverride;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_METRICS_PORT: u16 = 9091;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "*";
pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TMDB_TIMEOUT_SEC: u64 = 30;
pub const DEFAULT_GENRE_CACHE_TTL_HOURS: u64 = 12;
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_TIMEOUT_SEC: u64 = 120;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub allowed_origin: String,
    pub tmdb_base_url: String,
    pub tmdb_api_key: Option<String>,
    pub tmdb_timeout_sec: u64,
    pub genre_cache_ttl_hours: u64,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub llm_timeout_sec: u64,
    /// Raw `SCRIPT_STYLE_JSON` document.
    pub style_json: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            metrics_port: DEFAULT_METRICS_PORT,
            logging_level: RequestsLoggingLevel::default(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            tmdb_api_key: None,
            tmdb_timeout_sec: DEFAULT_TMDB_TIMEOUT_SEC,
            genre_cache_ttl_hours: DEFAULT_GENRE_CACHE_TTL_HOURS,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_api_key: None,
            llm_timeout_sec: DEFAULT_LLM_TIMEOUT_SEC,
            style_json: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub base_url: String,
    /// TMDB v3 key. Requests are still attempted without one.
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub genre_cache_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    /// Without a key every generation request fails.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub allowed_origin: String,
    pub catalog: CatalogSettings,
    pub llm: LlmSettings,
    pub style_override: Option<StyleOverride>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port {
            bail!("port and metrics_port must differ (both are {})", port);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let allowed_origin = file
            .allowed_origin
            .unwrap_or_else(|| cli.allowed_origin.clone());

        let catalog_file = file.catalog.unwrap_or_default();
        let catalog = CatalogSettings {
            base_url: catalog_file
                .base_url
                .unwrap_or_else(|| cli.tmdb_base_url.clone()),
            api_key: non_empty(catalog_file.api_key.or_else(|| cli.tmdb_api_key.clone())),
            timeout: positive_secs(
                "catalog.timeout_sec",
                catalog_file.timeout_sec.unwrap_or(cli.tmdb_timeout_sec),
            )?,
            genre_cache_ttl: Duration::from_secs(
                catalog_file
                    .genre_cache_ttl_hours
                    .unwrap_or(cli.genre_cache_ttl_hours)
                    * 60
                    * 60,
            ),
        };

        let llm_file = file.llm.unwrap_or_default();
        let llm = LlmSettings {
            base_url: llm_file
                .base_url
                .unwrap_or_else(|| cli.llm_base_url.clone()),
            model: llm_file.model.unwrap_or_else(|| cli.llm_model.clone()),
            api_key: non_empty(llm_file.api_key.or_else(|| cli.llm_api_key.clone())),
            timeout: positive_secs(
                "llm.timeout_sec",
                llm_file.timeout_sec.unwrap_or(cli.llm_timeout_sec),
            )?,
        };

        let style_override = match file.style {
            Some(table) => {
                let value = serde_json::to_value(table)
                    .context("Failed to convert [style] table")?;
                Some(
                    StyleOverride::from_value(&value)
                        .context("Invalid [style] table in config file")?,
                )
            }
            None => cli.style_json.as_deref().and_then(parse_style_json),
        };

        Ok(AppConfig {
            port,
            metrics_port,
            logging_level,
            allowed_origin,
            catalog,
            llm,
            style_override,
        })
    }
}

/// Parse the environment style document; an unusable one is logged and ignored.
fn parse_style_json(text: &str) -> Option<StyleOverride> {
    if text.trim().is_empty() {
        return None;
    }
    match StyleOverride::parse(text) {
        Ok(style) => Some(style),
        Err(e) => {
            warn!("Ignoring SCRIPT_STYLE_JSON: {}", e);
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn positive_secs(name: &str, secs: u64) -> Result<Duration> {
    if secs == 0 {
        bail!("{} must be greater than zero", name);
    }
    Ok(Duration::from_secs(secs))
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
