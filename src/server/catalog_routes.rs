//! Catalog proxy routes: trending, search, genres and discovery.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::error::ApiError;
use super::state::{GuardedCatalog, GuardedGenreCache, ServerState};
use crate::catalog::{
    DiscoverQuery, Genre, MoviePage, SearchQuery, TrendingQuery, DEFAULT_LANGUAGE,
    DEFAULT_REGION, DEFAULT_SORT,
};

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MoviePageResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub page: MoviePage,
}

impl From<MoviePage> for MoviePageResponse {
    fn from(page: MoviePage) -> Self {
        Self { ok: true, page }
    }
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub ok: bool,
    pub items: Vec<Genre>,
}

// =============================================================================
// Query Parsing
// =============================================================================

/// Lenient view over raw query parameters. Unusable values fall back to defaults.
struct QueryParams(HashMap<String, String>);

impl QueryParams {
    fn text(&self, key: &str, default: &str) -> String {
        self.0
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &str) -> Option<String> {
        self.0.get(key).filter(|v| !v.trim().is_empty()).cloned()
    }

    fn page(&self) -> u32 {
        self.0
            .get("page")
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    fn year(&self) -> Option<i32> {
        self.0.get("year").and_then(|y| y.trim().parse::<i32>().ok())
    }

    fn include_adult(&self) -> bool {
        self.0.get("includeAdult").map(String::as_str) == Some("true")
    }

    fn discover(&self, base: DiscoverQuery) -> DiscoverQuery {
        DiscoverQuery {
            page: self.page(),
            region: self.text("region", DEFAULT_REGION),
            sort_by: self.text("sortBy", DEFAULT_SORT),
            year: self.year(),
            include_adult: self.include_adult(),
            ..base
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn get_trending(
    State(catalog): State<GuardedCatalog>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<MoviePageResponse>, ApiError> {
    let params = QueryParams(params);
    let query = TrendingQuery {
        region: params.text("region", DEFAULT_REGION),
        page: params.page(),
        language: params.text("lang", DEFAULT_LANGUAGE),
    };

    let page = catalog
        .trending(&query)
        .await
        .map_err(|e| ApiError::catalog("/api/trending", e))?;
    Ok(Json(page.into()))
}

async fn get_search(
    State(catalog): State<GuardedCatalog>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<MoviePageResponse>, ApiError> {
    let params = QueryParams(params);
    let q = params
        .required("q")
        .ok_or_else(|| ApiError::bad_request("/api/search", "q required"))?;

    let query = SearchQuery {
        page: params.page(),
        region: params.text("region", DEFAULT_REGION),
        language: params.text("lang", DEFAULT_LANGUAGE),
        include_adult: params.include_adult(),
        year: params.year(),
        ..SearchQuery::new(q)
    };

    let page = catalog
        .search(&query)
        .await
        .map_err(|e| ApiError::catalog("/api/search", e))?;
    Ok(Json(page.into()))
}

async fn get_genres(
    State(genre_cache): State<GuardedGenreCache>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<GenresResponse>, ApiError> {
    let language = QueryParams(params).text("lang", DEFAULT_LANGUAGE);
    let items = genre_cache
        .get(&language)
        .await
        .map_err(|e| ApiError::catalog("/api/genres", e))?;
    Ok(Json(GenresResponse { ok: true, items }))
}

async fn get_by_genre(
    State(catalog): State<GuardedCatalog>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<MoviePageResponse>, ApiError> {
    const ENDPOINT: &str = "/api/movies/by-genre";
    let params = QueryParams(params);
    let genre_ids = params.required("genreId").ok_or_else(|| {
        ApiError::bad_request(ENDPOINT, "genreId required (e.g. 28 or 28,35)")
    })?;

    let query = params.discover(DiscoverQuery {
        genre_ids: Some(genre_ids),
        language: Some(params.text("lang", DEFAULT_LANGUAGE)),
        ..DiscoverQuery::default()
    });

    let page = catalog
        .discover(&query)
        .await
        .map_err(|e| ApiError::catalog(ENDPOINT, e))?;
    Ok(Json(page.into()))
}

async fn get_hindi(
    State(catalog): State<GuardedCatalog>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<MoviePageResponse>, ApiError> {
    let query = QueryParams(params).discover(DiscoverQuery::hindi());

    let page = catalog
        .discover(&query)
        .await
        .map_err(|e| ApiError::catalog("/api/movies/hindi", e))?;
    Ok(Json(page.into()))
}

async fn get_hindi_by_genre(
    State(catalog): State<GuardedCatalog>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<MoviePageResponse>, ApiError> {
    const ENDPOINT: &str = "/api/movies/hindi/by-genre";
    let params = QueryParams(params);
    let genre_ids = params
        .required("genreId")
        .ok_or_else(|| ApiError::bad_request(ENDPOINT, "genreId required"))?;

    let query = params.discover(DiscoverQuery {
        genre_ids: Some(genre_ids),
        ..DiscoverQuery::hindi()
    });

    let page = catalog
        .discover(&query)
        .await
        .map_err(|e| ApiError::catalog(ENDPOINT, e))?;
    Ok(Json(page.into()))
}

pub fn catalog_routes() -> Router<ServerState> {
    Router::new()
        .route("/trending", get(get_trending))
        .route("/search", get(get_search))
        .route("/genres", get(get_genres))
        .route("/movies/by-genre", get(get_by_genre))
        .route("/movies/hindi", get(get_hindi))
        .route("/movies/hindi/by-genre", get(get_hindi_by_genre))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let p = params(&[("page", "abc"), ("year", "soon")]);
        assert_eq!(p.page(), 1);
        assert_eq!(p.year(), None);

        assert_eq!(params(&[("page", "0")]).page(), 1);
        assert_eq!(params(&[("page", "4")]).page(), 4);
    }

    #[test]
    fn include_adult_only_for_literal_true() {
        assert!(params(&[("includeAdult", "true")]).include_adult());
        assert!(!params(&[("includeAdult", "TRUE")]).include_adult());
        assert!(!params(&[("includeAdult", "1")]).include_adult());
        assert!(!params(&[]).include_adult());
    }

    #[test]
    fn discover_keeps_base_filters() {
        let p = params(&[("sortBy", "vote_average.desc"), ("year", "2001")]);
        let query = p.discover(DiscoverQuery {
            genre_ids: Some("18".to_string()),
            ..DiscoverQuery::hindi()
        });
        assert_eq!(query.original_language.as_deref(), Some("hi"));
        assert_eq!(query.genre_ids.as_deref(), Some("18"));
        assert_eq!(query.sort_by, "vote_average.desc");
        assert_eq!(query.year, Some(2001));
        assert_eq!(query.region, "IN");
    }
}
