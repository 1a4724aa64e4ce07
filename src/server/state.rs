use axum::extract::FromRef;

use crate::catalog::{CatalogService, GenreCache};
use crate::generation::ArtifactGenerator;
use crate::reviews::ReviewStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalog = Arc<dyn CatalogService>;
pub type GuardedGenreCache = Arc<GenreCache>;
pub type GuardedGenerator = Arc<ArtifactGenerator>;
pub type GuardedReviewStore = Arc<ReviewStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog: GuardedCatalog,
    pub genre_cache: GuardedGenreCache,
    pub generator: GuardedGenerator,
    pub reviews: GuardedReviewStore,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        catalog: GuardedCatalog,
        genre_cache: GuardedGenreCache,
        generator: GuardedGenerator,
        reviews: GuardedReviewStore,
    ) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            catalog,
            genre_cache,
            generator,
            reviews,
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for GuardedGenreCache {
    fn from_ref(input: &ServerState) -> Self {
        input.genre_cache.clone()
    }
}

impl FromRef<ServerState> for GuardedGenerator {
    fn from_ref(input: &ServerState) -> Self {
        input.generator.clone()
    }
}

impl FromRef<ServerState> for GuardedReviewStore {
    fn from_ref(input: &ServerState) -> Self {
        input.reviews.clone()
    }
}
