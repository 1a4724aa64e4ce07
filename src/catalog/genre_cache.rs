//! Time-bounded cache of the TMDB genre list.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use super::client::{CatalogError, CatalogService};
use super::models::Genre;

/// Default freshness window of a cached genre list.
pub const DEFAULT_GENRE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Time source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CachedGenres {
    genres: Vec<Genre>,
    fetched_at: Instant,
}

/// Genre lists per response language, refreshed lazily once stale.
///
/// The lock is never held while the upstream is queried; concurrent refreshes
/// of the same language may both hit the upstream, and the last one wins.
pub struct GenreCache {
    catalog: Arc<dyn CatalogService>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedGenres>>,
}

impl GenreCache {
    pub fn new(catalog: Arc<dyn CatalogService>, ttl: Duration) -> Self {
        Self::with_clock(catalog, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        catalog: Arc<dyn CatalogService>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            clock,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, language: &str) -> Result<Vec<Genre>, CatalogError> {
        if let Some(genres) = self.fresh(language) {
            debug!(language, "Genre list served from cache");
            return Ok(genres);
        }

        let genres = self.catalog.genres(language).await?;
        let fetched_at = self.clock.now();
        self.entries.lock().unwrap().insert(
            language.to_string(),
            CachedGenres {
                genres: genres.clone(),
                fetched_at,
            },
        );
        debug!(language, count = genres.len(), "Genre list refreshed");
        Ok(genres)
    }

    fn fresh(&self, language: &str) -> Option<Vec<Genre>> {
        let now = self.clock.now();
        let entries = self.entries.lock().unwrap();
        entries
            .get(language)
            .filter(|cached| now.saturating_duration_since(cached.fetched_at) < self.ttl)
            .map(|cached| cached.genres.clone())
    }
}
