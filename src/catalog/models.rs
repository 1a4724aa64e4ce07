//! TMDB wire types and the reshaped models served to clients.

use serde::{Deserialize, Serialize};

pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

pub const DEFAULT_REGION: &str = "IN";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_SORT: &str = "popularity.desc";
pub const HINDI_LANGUAGE: &str = "hi";

// =============================================================================
// Upstream (TMDB) types
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Paginated movie listing as returned by trending, search and discover.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMoviePage {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

// =============================================================================
// Served types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    pub overview: String,
    /// Release year as text, empty when unknown.
    pub year: String,
    pub poster: Option<String>,
}

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        let title = movie
            .title
            .filter(|t| !t.is_empty())
            .or(movie.original_title)
            .unwrap_or_default();
        let year = movie
            .release_date
            .as_deref()
            .map(|d| d.chars().take(4).collect())
            .unwrap_or_default();
        let poster = movie
            .poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", POSTER_BASE_URL, p));

        Self {
            id: movie.id,
            title,
            overview: movie.overview.unwrap_or_default(),
            year,
            poster,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoviePage {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub items: Vec<MovieSummary>,
}

impl MoviePage {
    /// Reshape an upstream page. Missing or zero counters fall back to the
    /// requested page, a single page, and the number of items.
    pub fn from_tmdb(raw: TmdbMoviePage, requested_page: u32) -> Self {
        let items: Vec<MovieSummary> = raw.results.into_iter().map(MovieSummary::from).collect();
        Self {
            page: raw.page.filter(|p| *p > 0).unwrap_or(requested_page),
            total_pages: raw.total_pages.filter(|p| *p > 0).unwrap_or(1),
            total_results: raw
                .total_results
                .filter(|t| *t > 0)
                .unwrap_or(items.len() as u64),
            items,
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingQuery {
    pub region: String,
    pub page: u32,
    pub language: String,
}

impl Default for TrendingQuery {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            page: 1,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub page: u32,
    pub region: String,
    pub language: String,
    pub include_adult: bool,
    pub year: Option<i32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            region: DEFAULT_REGION.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            include_adult: false,
            year: None,
        }
    }
}

/// Parameters for `/discover/movie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverQuery {
    /// Comma-separated genre ids, e.g. `28` or `28,35`.
    pub genre_ids: Option<String>,
    pub original_language: Option<String>,
    pub page: u32,
    pub region: String,
    /// Response language; Hindi discovery leaves it unset.
    pub language: Option<String>,
    pub sort_by: String,
    pub year: Option<i32>,
    pub include_adult: bool,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            genre_ids: None,
            original_language: None,
            page: 1,
            region: DEFAULT_REGION.to_string(),
            language: None,
            sort_by: DEFAULT_SORT.to_string(),
            year: None,
            include_adult: false,
        }
    }
}

impl DiscoverQuery {
    /// Discovery restricted to Hindi-language originals.
    pub fn hindi() -> Self {
        Self {
            original_language: Some(HINDI_LANGUAGE.to_string()),
            ..Self::default()
        }
    }

    /// Query parameters for the upstream request, without the credential.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(language) = &self.original_language {
            params.push(("with_original_language", language.clone()));
        }
        if let Some(genres) = &self.genre_ids {
            params.push(("with_genres", genres.clone()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("region", self.region.clone()));
        if let Some(language) = &self.language {
            params.push(("language", language.clone()));
        }
        params.push(("sort_by", self.sort_by.clone()));
        params.push(("include_adult", self.include_adult.to_string()));
        if let Some(year) = self.year {
            params.push(("primary_release_year", year.to_string()));
        }
        params
    }
}
