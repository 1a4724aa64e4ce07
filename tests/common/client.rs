//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per gateway endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .expect("GET request failed")
    }

    async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// GET /api/health
    pub async fn get_health(&self) -> Response {
        self.get("/api/health", &[]).await
    }

    // ========================================================================
    // Catalog Endpoints
    // ========================================================================

    /// GET /api/trending
    pub async fn get_trending(&self, query: &[(&str, &str)]) -> Response {
        self.get("/api/trending", query).await
    }

    /// GET /api/search
    pub async fn search(&self, query: &[(&str, &str)]) -> Response {
        self.get("/api/search", query).await
    }

    /// GET /api/genres
    pub async fn get_genres(&self, query: &[(&str, &str)]) -> Response {
        self.get("/api/genres", query).await
    }

    /// GET /api/movies/by-genre
    pub async fn get_movies_by_genre(&self, query: &[(&str, &str)]) -> Response {
        self.get("/api/movies/by-genre", query).await
    }

    /// GET /api/movies/hindi
    pub async fn get_hindi_movies(&self, query: &[(&str, &str)]) -> Response {
        self.get("/api/movies/hindi", query).await
    }

    /// GET /api/movies/hindi/by-genre
    pub async fn get_hindi_movies_by_genre(&self, query: &[(&str, &str)]) -> Response {
        self.get("/api/movies/hindi/by-genre", query).await
    }

    // ========================================================================
    // Generation Endpoints
    // ========================================================================

    /// POST /api/scripts
    pub async fn generate_script(&self, body: &Value) -> Response {
        self.post("/api/scripts", body).await
    }

    /// POST /api/review
    pub async fn generate_review(&self, body: &Value) -> Response {
        self.post("/api/review", body).await
    }

    // ========================================================================
    // User Reviews
    // ========================================================================

    /// POST /api/reviews
    pub async fn add_review(&self, body: &Value) -> Response {
        self.post("/api/reviews", body).await
    }

    /// GET /api/reviews/{movie_id}
    pub async fn list_reviews(&self, movie_id: &str) -> Response {
        self.get(&format!("/api/reviews/{}", movie_id), &[]).await
    }
}
