use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    middleware,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::catalog_routes::catalog_routes;
use super::generation_routes::generation_routes;
use super::metrics::metrics_handler;
use super::review_routes::review_routes;
use super::{log_requests, state::ServerState, ServerConfig};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    time: String,
    uptime_sec: u64,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime_sec: state.start_time.elapsed().as_secs(),
    })
}

fn make_cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allowed_origin.trim() == "*" {
        return Ok(layer.allow_origin(Any));
    }
    let origin = HeaderValue::from_str(config.allowed_origin.trim())
        .with_context(|| format!("Invalid allowed origin: {:?}", config.allowed_origin))?;
    Ok(layer.allow_origin(origin))
}

pub fn make_app(state: ServerState) -> Result<Router> {
    let api_routes: Router<ServerState> = Router::new()
        .route("/health", get(health))
        .merge(catalog_routes())
        .merge(generation_routes())
        .merge(review_routes());

    let app: Router = Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(make_cors_layer(&state.config)?)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state);

    Ok(app)
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(state: ServerState) -> Result<()> {
    let port = state.config.port;
    let metrics_port = state.config.metrics_port;
    let app = make_app(state)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Listening on port {}", port);
    info!("Serving metrics on port {}", metrics_port);

    tokio::try_join!(
        async { axum::serve(listener, app).await.context("HTTP server failed") },
        async {
            axum::serve(metrics_listener, make_metrics_app())
                .await
                .context("Metrics server failed")
        },
    )?;
    Ok(())
}
