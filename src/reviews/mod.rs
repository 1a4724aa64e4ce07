//! In-memory store of user-submitted reviews.
//!
//! Reviews live for the lifetime of the process only.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReview {
    /// Millisecond timestamp of insertion, unique within the store.
    pub id: i64,
    pub movie_id: String,
    pub text: String,
    pub rating: f64,
}

/// A review as submitted, before it gets an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub movie_id: String,
    pub text: String,
    pub rating: f64,
}

impl NewReview {
    /// Read `{movieId, text, rating?}`. `movieId` may be text or a number;
    /// a missing or non-numeric rating becomes 0. Returns `None` when
    /// `movieId` or `text` is missing or empty.
    pub fn from_json(body: &Value) -> Option<Self> {
        let movie_id = match body.get("movieId")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let text = body.get("text").and_then(Value::as_str)?.to_string();
        if movie_id.is_empty() || text.is_empty() {
            return None;
        }

        let rating = match body.get("rating") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };

        Some(Self {
            movie_id,
            text,
            rating: if rating.is_finite() { rating } else { 0.0 },
        })
    }
}

#[derive(Default)]
pub struct ReviewStore {
    reviews: Mutex<Vec<StoredReview>>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, review: NewReview) -> StoredReview {
        let mut reviews = self.reviews.lock().unwrap();
        let now = chrono::Utc::now().timestamp_millis();
        let id = match reviews.last() {
            Some(last) if last.id >= now => last.id + 1,
            _ => now,
        };

        let stored = StoredReview {
            id,
            movie_id: review.movie_id,
            text: review.text,
            rating: review.rating,
        };
        reviews.push(stored.clone());
        stored
    }

    /// Reviews for one movie, oldest first.
    pub fn list(&self, movie_id: &str) -> Vec<StoredReview> {
        self.reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect()
    }
}
