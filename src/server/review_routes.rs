//! User review routes backed by the in-memory store.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::error::ApiError;
use super::generation_routes::read_body;
use super::state::{GuardedReviewStore, ServerState};
use crate::reviews::{NewReview, StoredReview};

#[derive(Debug, Serialize)]
pub struct AddReviewResponse {
    pub ok: bool,
    pub review: StoredReview,
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub ok: bool,
    pub items: Vec<StoredReview>,
}

async fn add_review(
    State(reviews): State<GuardedReviewStore>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AddReviewResponse>, ApiError> {
    const ENDPOINT: &str = "/api/reviews";
    let body = read_body(ENDPOINT, body)?;
    let review = NewReview::from_json(&body)
        .ok_or_else(|| ApiError::bad_request(ENDPOINT, "movieId & text required"))?;

    let review = reviews.add(review);
    info!(movie_id = %review.movie_id, review_id = review.id, "Stored review");
    Ok(Json(AddReviewResponse { ok: true, review }))
}

async fn list_reviews(
    State(reviews): State<GuardedReviewStore>,
    Path(movie_id): Path<String>,
) -> Json<ReviewListResponse> {
    Json(ReviewListResponse {
        ok: true,
        items: reviews.list(&movie_id),
    })
}

pub fn review_routes() -> Router<ServerState> {
    Router::new()
        .route("/reviews", post(add_review))
        .route("/reviews/{movie_id}", get(list_reviews))
}
