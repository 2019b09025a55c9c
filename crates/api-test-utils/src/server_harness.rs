//! Test server harness for E2E testing
//!
//! Provides `TestApiServer` for spawning real API server instances in tests,
//! backed by an in-memory document store.

use flate2::read::GzDecoder;
use meuparlamento_api::config::Config;
use meuparlamento_api::repositories::mock::InMemoryStore;
use meuparlamento_api::routes::{self, AppState};
use meuparlamento_api::services::ProposalService;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the meuParlamento API in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health_flow_e2e() -> Result<()> {
///     let server = TestApiServer::spawn(Arc::new(InMemoryStore::new())).await?;
///
///     let response = reqwest::get(format!("{}/health", server.url())).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestApiServer {
    addr: SocketAddr,
    store: Arc<InMemoryStore>,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestApiServer {
    /// Spawn a server with default configuration.
    pub async fn spawn(store: Arc<InMemoryStore>) -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(store, HashMap::new()).await
    }

    /// Spawn a server, overriding configuration variables.
    ///
    /// The server binds to a random available port (127.0.0.1:0) and runs in
    /// the background until the harness is dropped.
    pub async fn spawn_with_vars(
        store: Arc<InMemoryStore>,
        mut vars: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        vars.entry("BIND_ADDRESS".to_string())
            .or_insert_with(|| "127.0.0.1:0".to_string());

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let state = Arc::new(AppState {
            service: ProposalService::new(store.clone(), config.vote_matching),
            config: config.clone(),
        });

        // Standalone recorder: the global one can only be installed once per process.
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            store,
            config,
            _handle: handle,
        })
    }

    /// Get reference to the backing store.
    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestApiServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

/// Read a gzip-compressed JSON response body.
///
/// Fails if the response is not marked `Content-Encoding: gzip`.
pub async fn decode_gzip_json(
    response: reqwest::Response,
) -> Result<serde_json::Value, anyhow::Error> {
    let encoding = response
        .headers()
        .get(reqwest::header::CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if encoding.as_deref() != Some("gzip") {
        anyhow::bail!("expected gzip content encoding, got {:?}", encoding);
    }

    let bytes = response.bytes().await?;
    let mut json = String::new();
    GzDecoder::new(bytes.as_ref()).read_to_string(&mut json)?;

    Ok(serde_json::from_str(&json)?)
}
