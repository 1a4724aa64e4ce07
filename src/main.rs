use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cineshorts_server::catalog::{CatalogService, GenreCache, TmdbClient};
use cineshorts_server::config::{self, AppConfig};
use cineshorts_server::generation::{ArtifactGenerator, GenerationClient, StyleResolver};
use cineshorts_server::llm::OpenAIProvider;
use cineshorts_server::reviews::ReviewStore;
use cineshorts_server::server::{
    metrics, run_server, RequestsLoggingLevel, ServerConfig, ServerState,
};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = config::DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Origin allowed by CORS, `*` for any.
    #[clap(long, env = "ALLOWED_ORIGIN", default_value = config::DEFAULT_ALLOWED_ORIGIN)]
    pub allowed_origin: String,

    /// TMDB v3 API root.
    #[clap(long, default_value = config::DEFAULT_TMDB_BASE_URL)]
    pub tmdb_base_url: String,

    /// TMDB v3 API key.
    #[clap(long, env = "TMDB_KEY", hide_env_values = true)]
    pub tmdb_key: Option<String>,

    /// Timeout in seconds for TMDB requests.
    #[clap(long, default_value_t = config::DEFAULT_TMDB_TIMEOUT_SEC)]
    pub tmdb_timeout_sec: u64,

    /// Hours a fetched genre list stays fresh.
    #[clap(long, default_value_t = config::DEFAULT_GENRE_CACHE_TTL_HOURS)]
    pub genre_cache_ttl_hours: u64,

    /// OpenAI-compatible API root.
    #[clap(long, default_value = config::DEFAULT_LLM_BASE_URL)]
    pub llm_base_url: String,

    /// Model used for script and review generation.
    #[clap(long, default_value = config::DEFAULT_LLM_MODEL)]
    pub llm_model: String,

    /// API key for the LLM provider. Generation is disabled without it.
    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Timeout in seconds for LLM requests.
    #[clap(long, default_value_t = config::DEFAULT_LLM_TIMEOUT_SEC)]
    pub llm_timeout_sec: u64,

    /// JSON object overriding the default style profile.
    #[clap(long, env = "SCRIPT_STYLE_JSON")]
    pub script_style_json: Option<String>,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            allowed_origin: args.allowed_origin.clone(),
            tmdb_base_url: args.tmdb_base_url.clone(),
            tmdb_api_key: args.tmdb_key.clone(),
            tmdb_timeout_sec: args.tmdb_timeout_sec,
            genre_cache_ttl_hours: args.genre_cache_ttl_hours,
            llm_base_url: args.llm_base_url.clone(),
            llm_model: args.llm_model.clone(),
            llm_api_key: args.openai_api_key.clone(),
            llm_timeout_sec: args.llm_timeout_sec,
            style_json: args.script_style_json.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_result = dotenvy::dotenv();
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    if let Ok(path) = dotenv_result {
        info!("Loaded environment from {:?}", path);
    }

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  port: {}", app_config.port);
    info!("  catalog: {}", app_config.catalog.base_url);
    info!("  llm: {} ({})", app_config.llm.base_url, app_config.llm.model);

    info!("Initializing metrics...");
    metrics::init_metrics();

    if app_config.catalog.api_key.is_none() {
        warn!("TMDB_KEY is not set; catalog requests will be rejected upstream");
    }
    let catalog: Arc<dyn CatalogService> = Arc::new(TmdbClient::new(
        &app_config.catalog.base_url,
        app_config.catalog.api_key.clone().unwrap_or_default(),
        app_config.catalog.timeout,
    )?);
    let genre_cache = Arc::new(GenreCache::new(
        catalog.clone(),
        app_config.catalog.genre_cache_ttl,
    ));

    let client = match &app_config.llm.api_key {
        Some(api_key) => {
            let provider = OpenAIProvider::new(
                &app_config.llm.base_url,
                &app_config.llm.model,
                api_key.clone(),
            );
            Some(GenerationClient::new(Arc::new(provider), app_config.llm.timeout))
        }
        None => None,
    };
    let generator = ArtifactGenerator::new(
        client,
        StyleResolver::new(app_config.style_override.clone()),
    );
    if !generator.is_configured() {
        warn!("OPENAI_API_KEY is not set; generation endpoints will fail");
    }

    let state = ServerState::new(
        ServerConfig {
            requests_logging_level: app_config.logging_level.clone(),
            port: app_config.port,
            metrics_port: app_config.metrics_port,
            allowed_origin: app_config.allowed_origin.clone(),
        },
        catalog,
        genre_cache,
        Arc::new(generator),
        Arc::new(ReviewStore::new()),
    );

    info!("Ready to serve at port {}!", app_config.port);
    info!("Metrics available at port {}!", app_config.metrics_port);

    tokio::select! {
        result = run_server(state) => {
            info!("HTTP server stopped: {:?}", result);
            result
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
