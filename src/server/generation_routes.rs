//! Script and review generation routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::error::ApiError;
use super::state::{GuardedGenerator, ServerState};
use crate::generation::{GenerationRequest, ReviewArtifact, ScriptArtifact};

#[derive(Debug, Serialize)]
pub struct ScriptResponse {
    pub ok: bool,
    pub script: ScriptArtifact,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub ok: bool,
    pub review: ReviewArtifact,
}

/// A missing or unreadable body is treated as an empty object. Only an
/// oversized body is an error.
pub(super) fn read_body(
    endpoint: &'static str,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Value, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::payload_too_large(endpoint))
        }
        Err(rejection) => {
            debug!("Ignoring unreadable request body: {}", rejection);
            Ok(Value::Object(Default::default()))
        }
    }
}

/// Input errors are reported before the credential is looked at.
fn parse_request(endpoint: &'static str, body: &Value) -> Result<GenerationRequest, ApiError> {
    GenerationRequest::from_json(body).map_err(|e| ApiError::generation(endpoint, e))
}

async fn post_script(
    State(generator): State<GuardedGenerator>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ScriptResponse>, ApiError> {
    const ENDPOINT: &str = "/api/scripts";
    let body = read_body(ENDPOINT, body)?;
    let request = parse_request(ENDPOINT, &body)?;

    let script = generator
        .generate_script(&request)
        .await
        .map_err(|e| ApiError::generation(ENDPOINT, e))?;
    Ok(Json(ScriptResponse { ok: true, script }))
}

async fn post_review(
    State(generator): State<GuardedGenerator>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ReviewResponse>, ApiError> {
    const ENDPOINT: &str = "/api/review";
    let body = read_body(ENDPOINT, body)?;
    let request = parse_request(ENDPOINT, &body)?;

    let review = generator
        .generate_review(&request)
        .await
        .map_err(|e| ApiError::generation(ENDPOINT, e))?;
    Ok(Json(ReviewResponse { ok: true, review }))
}

pub fn generation_routes() -> Router<ServerState> {
    Router::new()
        .route("/scripts", post(post_script))
        .route("/review", post(post_review))
}
