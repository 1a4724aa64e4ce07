//! Test server lifecycle management
//!
//! Each test gets an isolated gateway wired to its own fake upstreams.

use super::constants::*;
use super::upstreams::{serve, FakeLlm, FakeTmdb, RecordedRequest};
use cineshorts_server::catalog::{CatalogService, GenreCache, TmdbClient, DEFAULT_GENRE_TTL};
use cineshorts_server::generation::{
    ArtifactGenerator, GenerationClient, StyleOverride, StyleResolver,
};
use cineshorts_server::llm::OpenAIProvider;
use cineshorts_server::reviews::ReviewStore;
use cineshorts_server::server::{make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Knobs for [`TestServer::spawn_with`].
#[derive(Default)]
pub struct TestServerOptions {
    /// Leave the LLM credential unset.
    pub without_llm_key: bool,
    /// Key handed to the TMDB client, defaults to [`TEST_TMDB_KEY`].
    pub tmdb_key: Option<String>,
    /// Startup style override, as if read from the environment.
    pub style_override: Option<StyleOverride>,
    pub allowed_origin: Option<String>,
}

/// Test server instance with isolated fake upstreams
///
/// When dropped, the gateway and both upstreams shut down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    tmdb: FakeTmdb,
    llm: FakeLlm,

    // Private fields - keep resources alive until drop
    _shutdown_txs: Vec<oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a fully configured server on a random port
    pub async fn spawn() -> Self {
        Self::spawn_with(TestServerOptions::default()).await
    }

    /// Spawns a server whose generation endpoints have no LLM credential
    pub async fn spawn_without_llm_key() -> Self {
        Self::spawn_with(TestServerOptions {
            without_llm_key: true,
            ..Default::default()
        })
        .await
    }

    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Starts a fake TMDB and a fake LLM upstream
    /// 2. Builds the real clients against them
    /// 3. Binds the gateway to a random port (127.0.0.1:0)
    /// 4. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if any port binding fails or the server doesn't become ready
    /// within the timeout.
    pub async fn spawn_with(options: TestServerOptions) -> Self {
        let tmdb = FakeTmdb::default();
        let (tmdb_url, tmdb_shutdown) = serve(tmdb.router()).await;
        let llm = FakeLlm::new(SCRIPT_REPLY);
        let (llm_url, llm_shutdown) = serve(llm.router()).await;

        let catalog: Arc<dyn CatalogService> = Arc::new(
            TmdbClient::new(
                &tmdb_url,
                options
                    .tmdb_key
                    .unwrap_or_else(|| TEST_TMDB_KEY.to_string()),
                Duration::from_secs(REQUEST_TIMEOUT_SECS),
            )
            .expect("Failed to build TMDB client"),
        );
        let genre_cache = Arc::new(GenreCache::new(catalog.clone(), DEFAULT_GENRE_TTL));

        let client = if options.without_llm_key {
            None
        } else {
            let provider =
                OpenAIProvider::new(format!("{}/v1", llm_url), "gpt-4o-mini", TEST_OPENAI_KEY);
            Some(GenerationClient::new(
                Arc::new(provider),
                Duration::from_secs(REQUEST_TIMEOUT_SECS),
            ))
        };
        let generator = ArtifactGenerator::new(client, StyleResolver::new(options.style_override));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            metrics_port: 0,
            allowed_origin: options.allowed_origin.unwrap_or_else(|| "*".to_string()),
        };
        let state = ServerState::new(
            config,
            catalog,
            genre_cache,
            Arc::new(generator),
            Arc::new(ReviewStore::new()),
        );
        let app = make_app(state).expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            tmdb,
            llm,
            _shutdown_txs: vec![shutdown_tx, tmdb_shutdown, llm_shutdown],
        };

        server.wait_for_ready().await;

        server
    }

    /// Requests the fake TMDB upstream received on `path`
    pub fn tmdb_requests(&self, path: &str) -> Vec<RecordedRequest> {
        self.tmdb.requests(path)
    }

    /// Replaces what the fake model answers from now on
    pub fn set_llm_reply(&self, reply: &str) {
        self.llm.set_reply(reply);
    }

    /// Chat completion request bodies the fake model received
    pub fn llm_requests(&self) -> Vec<Value> {
        self.llm.bodies()
    }

    /// Waits for the server to become ready by polling the health endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client
                .get(format!("{}/api/health", self.base_url))
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        for tx in self._shutdown_txs.drain(..) {
            let _ = tx.send(());
        }
    }
}
