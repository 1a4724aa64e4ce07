//! The `{ok: false, ...}` error envelope returned by every route.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use super::metrics;
use crate::catalog::CatalogError;
use crate::generation::{FieldIssue, GenerationError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldIssue>>,
}

#[derive(Debug)]
enum ErrorKind {
    BadRequest(String),
    PayloadTooLarge,
    Validation(Vec<FieldIssue>),
    Internal { error_type: &'static str, message: String },
}

/// A failed request, tagged with the route it failed on.
#[derive(Debug)]
pub struct ApiError {
    endpoint: &'static str,
    kind: ErrorKind,
}

impl ApiError {
    pub fn bad_request(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self {
            endpoint,
            kind: ErrorKind::BadRequest(message.into()),
        }
    }

    pub fn payload_too_large(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            kind: ErrorKind::PayloadTooLarge,
        }
    }

    pub fn catalog(endpoint: &'static str, err: CatalogError) -> Self {
        Self {
            endpoint,
            kind: ErrorKind::Internal {
                error_type: "catalog",
                message: err.to_string(),
            },
        }
    }

    pub fn generation(endpoint: &'static str, err: GenerationError) -> Self {
        let kind = match err {
            GenerationError::Input(message) => ErrorKind::BadRequest(message),
            GenerationError::Validation(e) => ErrorKind::Validation(e.issues),
            other => ErrorKind::Internal {
                error_type: other.kind(),
                message: other.to_string(),
            },
        };
        Self { endpoint, kind }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::BadRequest(_) | ErrorKind::Validation(_) => StatusCode::BAD_REQUEST,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let endpoint = self.endpoint;

        let body = match self.kind {
            ErrorKind::BadRequest(message) => {
                warn!(endpoint, error = %message, "Rejected request");
                metrics::record_error("bad_request", endpoint);
                ErrorResponse {
                    ok: false,
                    error: message,
                    details: None,
                }
            }
            ErrorKind::PayloadTooLarge => {
                warn!(endpoint, "Rejected oversized body");
                metrics::record_error("payload_too_large", endpoint);
                ErrorResponse {
                    ok: false,
                    error: "payload too large".to_string(),
                    details: None,
                }
            }
            ErrorKind::Validation(issues) => {
                warn!(endpoint, issues = issues.len(), "Model output failed validation");
                metrics::record_error("validation", endpoint);
                ErrorResponse {
                    ok: false,
                    error: "bad_request".to_string(),
                    details: Some(issues),
                }
            }
            ErrorKind::Internal {
                error_type,
                message,
            } => {
                error!(endpoint, error_type, error = %message, "Request failed");
                metrics::record_error(error_type, endpoint);
                ErrorResponse {
                    ok: false,
                    error: message,
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
