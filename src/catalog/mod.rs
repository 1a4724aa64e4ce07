//! Movie catalog proxy backed by TMDB.

mod client;
mod genre_cache;
mod models;

pub use client::{CatalogError, CatalogService, TmdbClient};
#[cfg(feature = "mock")]
pub use client::MockCatalogService;
pub use genre_cache::{Clock, GenreCache, SystemClock, DEFAULT_GENRE_TTL};
pub use models::{
    DiscoverQuery, Genre, MoviePage, MovieSummary, SearchQuery, TrendingQuery, DEFAULT_LANGUAGE,
    DEFAULT_REGION, DEFAULT_SORT,
};
