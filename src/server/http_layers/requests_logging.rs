//! Per-request logging and HTTP metrics.

use super::super::state::ServerState;
use crate::server::metrics::{categorize_endpoint, record_http_request};
use axum::{
    body::Body,
    extract::State,
    http::{header::HeaderMap, Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use std::time::Instant;
use tracing::{error, info};

/// How much of each request is written to the log.
#[derive(PartialEq, PartialOrd, Clone, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
    Body,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Bodies at or above this size are summarized instead of printed.
const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

fn content_length(headers: &HeaderMap) -> Result<usize, &'static str> {
    headers
        .get("content-length")
        .ok_or("content-length not set")?
        .to_str()
        .map_err(|_| "content-length is not text")?
        .parse::<usize>()
        .map_err(|_| "content-length is not a number")
}

fn log_headers(direction: &str, headers: &HeaderMap) {
    info!("  {} headers:", direction);
    for (name, value) in headers {
        info!("    {:?}: {:?}", name, value);
    }
}

/// Prints small bodies and hands back an equivalent body for the next stage.
async fn log_body(direction: &str, headers: &HeaderMap, body: Body) -> Result<Body, axum::Error> {
    let size = match content_length(headers) {
        Ok(size) => size,
        Err(reason) => {
            info!("  {} body: {}", direction, reason);
            return Ok(body);
        }
    };
    if size >= MAX_LOGGABLE_BODY_LENGTH {
        info!(
            "  {} body: too big to log ({:#})",
            direction,
            byte_unit::Byte::from(size)
        );
        return Ok(body);
    }

    let bytes = axum::body::to_bytes(body, size).await?;
    info!("  {} body:\n{}", direction, String::from_utf8_lossy(&bytes));
    Ok(Body::from(bytes))
}

fn internal_error() -> Response<Body> {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

pub async fn log_requests(
    State(state): State<ServerState>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let level = state.config.requests_logging_level.clone();
    let start = Instant::now();

    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", method, request.uri());
    }
    if level >= RequestsLoggingLevel::Headers {
        log_headers("Req", request.headers());
    }

    let request = if level >= RequestsLoggingLevel::Body {
        let (parts, body) = request.into_parts();
        match log_body("Req", &parts.headers, body).await {
            Ok(body) => Request::from_parts(parts, body),
            Err(err) => {
                error!("Failed to read request body: {:?}", err);
                return internal_error();
            }
        }
    } else {
        request
    };

    let response = next.run(request).await;

    if level >= RequestsLoggingLevel::Headers {
        log_headers("Resp", response.headers());
    }

    let response = if level >= RequestsLoggingLevel::Body {
        let (parts, body) = response.into_parts();
        match log_body("Resp", &parts.headers, body).await {
            Ok(body) => Response::from_parts(parts, body),
            Err(err) => {
                error!("Failed to read response body: {:?}", err);
                return internal_error();
            }
        }
    } else {
        response
    };

    let status = response.status().as_u16();
    let duration = start.elapsed();
    if level > RequestsLoggingLevel::None {
        info!("<<< {} ({}ms)", status, duration.as_millis());
    }
    record_http_request(&method, categorize_endpoint(&path), status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use clap::ValueEnum;

    #[test]
    fn level_ordering() {
        let none = RequestsLoggingLevel::None;

        assert!(none < RequestsLoggingLevel::Headers);
        assert!(RequestsLoggingLevel::Body > RequestsLoggingLevel::Path);
        assert_eq!(RequestsLoggingLevel::default(), RequestsLoggingLevel::Path);
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!(
            RequestsLoggingLevel::from_str("Headers", true).unwrap(),
            RequestsLoggingLevel::Headers
        );
    }

    #[test]
    fn content_length_reasons() {
        let mut headers = HeaderMap::new();
        assert!(content_length(&headers).is_err());

        headers.insert("content-length", HeaderValue::from_static("abc"));
        assert_eq!(content_length(&headers), Err("content-length is not a number"));

        headers.insert("content-length", HeaderValue::from_static("42"));
        assert_eq!(content_length(&headers), Ok(42));
    }

    #[tokio::test]
    async fn logged_body_is_passed_through() {
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("11"));
        let body = log_body("Req", &headers, Body::from("{\"a\":true}\n"))
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"{\"a\":true}\n");
    }
}
