//! HTTP client for the TMDB v3 API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::models::{
    DiscoverQuery, Genre, MoviePage, SearchQuery, TmdbGenreList, TmdbMoviePage, TrendingQuery,
};
use crate::server::metrics;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TMDB request to {path} failed: {message}")]
    Request { path: String, message: String },

    #[error("TMDB {path} returned status {status}")]
    Status { path: String, status: u16 },

    #[error("Failed to parse TMDB response from {path}: {message}")]
    Decode { path: String, message: String },
}

/// Movie catalog queries, already reshaped for clients.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn trending(&self, query: &TrendingQuery) -> Result<MoviePage, CatalogError>;

    async fn search(&self, query: &SearchQuery) -> Result<MoviePage, CatalogError>;

    /// Uncached genre list in the given language.
    async fn genres(&self, language: &str) -> Result<Vec<Genre>, CatalogError>;

    async fn discover(&self, query: &DiscoverQuery) -> Result<MoviePage, CatalogError>;
}

pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "https://api.themoviedb.org/3")
    /// * `api_key` - v3 API key, sent as the `api_key` query parameter
    /// * `timeout` - Request timeout
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Request {
                path: String::new(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path = %path, "TMDB request");

        let start = Instant::now();
        let result = self.send(&url, path, params).await;
        metrics::record_upstream_call("tmdb", result.is_ok(), start.elapsed());
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: &str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::Request {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| CatalogError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogService for TmdbClient {
    async fn trending(&self, query: &TrendingQuery) -> Result<MoviePage, CatalogError> {
        let params = [
            ("region", query.region.clone()),
            ("page", query.page.to_string()),
            ("language", query.language.clone()),
        ];
        let raw: TmdbMoviePage = self.get("/trending/movie/day", &params).await?;
        Ok(MoviePage::from_tmdb(raw, query.page))
    }

    async fn search(&self, query: &SearchQuery) -> Result<MoviePage, CatalogError> {
        let mut params = vec![
            ("query", query.query.clone()),
            ("page", query.page.to_string()),
            ("region", query.region.clone()),
            ("language", query.language.clone()),
            ("include_adult", query.include_adult.to_string()),
        ];
        if let Some(year) = query.year {
            params.push(("year", year.to_string()));
        }
        let raw: TmdbMoviePage = self.get("/search/movie", &params).await?;
        Ok(MoviePage::from_tmdb(raw, query.page))
    }

    async fn genres(&self, language: &str) -> Result<Vec<Genre>, CatalogError> {
        let params = [("language", language.to_string())];
        let list: TmdbGenreList = self.get("/genre/movie/list", &params).await?;
        Ok(list.genres)
    }

    async fn discover(&self, query: &DiscoverQuery) -> Result<MoviePage, CatalogError> {
        let raw: TmdbMoviePage = self.get("/discover/movie", &query.to_params()).await?;
        Ok(MoviePage::from_tmdb(raw, query.page))
    }
}
