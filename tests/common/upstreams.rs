//! In-process fake upstreams
//!
//! A TMDB v3 lookalike and an OpenAI-compatible chat completions endpoint,
//! both recording what they were asked so tests can assert on forwarding.

use super::constants::*;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// One request received by the fake TMDB upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub params: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct FakeTmdb {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeTmdb {
    pub fn requests(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    fn record(&self, path: &str, params: HashMap<String, String>) -> Result<(), Response> {
        let authorized = params.get("api_key").map(String::as_str) == Some(TEST_TMDB_KEY);
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            params,
        });
        if authorized {
            Ok(())
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"status_message": "Invalid API key"})),
            )
                .into_response())
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/trending/movie/day", get(trending))
            .route("/search/movie", get(search))
            .route("/discover/movie", get(discover))
            .route("/genre/movie/list", get(genres))
            .with_state(self.clone())
    }
}

fn page_of(movies: Vec<Value>, page: &str) -> Value {
    let page: u32 = page.parse().unwrap_or(1);
    json!({
        "page": page,
        "total_pages": 3,
        "total_results": 42,
        "results": movies,
    })
}

fn inception() -> Value {
    json!({
        "id": MOVIE_1_ID,
        "title": MOVIE_1_TITLE,
        "overview": "A thief who steals secrets through dreams.",
        "release_date": "2010-07-16",
        "poster_path": POSTER_PATH,
    })
}

fn three_idiots() -> Value {
    json!({
        "id": MOVIE_2_ID,
        "title": "",
        "original_title": MOVIE_2_TITLE,
        "overview": "Two friends search for a long lost companion.",
        "release_date": "2009-12-25",
        "poster_path": null,
    })
}

async fn trending(
    State(fake): State<FakeTmdb>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejection) = fake.record("/trending/movie/day", params.clone()) {
        return rejection;
    }
    let page = params.get("page").cloned().unwrap_or_default();
    Json(page_of(vec![inception(), three_idiots()], &page)).into_response()
}

async fn search(
    State(fake): State<FakeTmdb>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejection) = fake.record("/search/movie", params.clone()) {
        return rejection;
    }
    let query = params.get("query").cloned().unwrap_or_default().to_lowercase();
    let results: Vec<Value> = [inception(), three_idiots()]
        .into_iter()
        .filter(|m| {
            let title = m["title"].as_str().unwrap_or_default();
            let original = m["original_title"].as_str().unwrap_or_default();
            title.to_lowercase().contains(&query) || original.to_lowercase().contains(&query)
        })
        .collect();
    // Search results come back without counters.
    Json(json!({ "results": results })).into_response()
}

async fn discover(
    State(fake): State<FakeTmdb>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejection) = fake.record("/discover/movie", params.clone()) {
        return rejection;
    }
    let page = params.get("page").cloned().unwrap_or_default();
    let movies = match params.get("with_original_language").map(String::as_str) {
        Some("hi") => vec![three_idiots()],
        _ => vec![inception()],
    };
    Json(page_of(movies, &page)).into_response()
}

async fn genres(
    State(fake): State<FakeTmdb>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejection) = fake.record("/genre/movie/list", params.clone()) {
        return rejection;
    }
    Json(json!({
        "genres": [
            {"id": GENRE_ACTION_ID, "name": "Action"},
            {"id": GENRE_COMEDY_ID, "name": "Comedy"},
        ]
    }))
    .into_response()
}

/// OpenAI-compatible upstream answering every completion with a configurable reply.
#[derive(Clone)]
pub struct FakeLlm {
    reply: Arc<Mutex<String>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl FakeLlm {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Arc::new(Mutex::new(reply.to_string())),
            bodies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_reply(&self, reply: &str) {
        *self.reply.lock().unwrap() = reply.to_string();
    }

    /// Request bodies received so far, oldest first.
    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(self.clone())
    }
}

async fn chat_completions(
    State(fake): State<FakeLlm>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let expected = format!("Bearer {}", TEST_OPENAI_KEY);
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Incorrect API key provided"}})),
        )
            .into_response();
    }

    fake.bodies.lock().unwrap().push(body);
    let reply = fake.reply.lock().unwrap().clone();
    Json(json!({
        "choices": [{
            "message": {"role": "assistant", "content": reply},
            "finish_reason": "stop",
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200},
    }))
    .into_response()
}

/// Serves `router` on a random local port until the returned sender fires or drops.
pub async fn serve(router: Router) -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream port");
    let port = listener
        .local_addr()
        .expect("Failed to get upstream address")
        .port();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Upstream failed");
    });

    (format!("http://127.0.0.1:{}", port), shutdown_tx)
}
