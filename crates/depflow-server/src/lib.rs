//! HTTP server exposing the dependency-graph computation

pub mod handlers;
pub mod router;
pub mod sanitize;


use std::net::SocketAddr;
use std::sync::Arc;

use depflow_indexer::Coordinator;

pub use sanitize::{DefaultSanitizer, PathSanitizer};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7890,
        }
    }
}

/// Shared state handed to every request handler.
pub struct ServerState {
    pub coordinator: Arc<Coordinator>,
    pub sanitizer: Arc<dyn PathSanitizer>,
}

impl ServerState {
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        Self {
            coordinator,
            sanitizer: Arc::new(DefaultSanitizer),
        }
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn PathSanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }
}

pub struct DepflowServer {
    config: ServerConfig,
    state: Arc<ServerState>,
}

impl DepflowServer {
    pub fn new(coordinator: Arc<Coordinator>, config: ServerConfig) -> Self {
        Self {
            config,
            state: Arc::new(ServerState::new(coordinator)),
        }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> anyhow::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Listening on http://{}", listener.local_addr()?);

        let app = router::create_router(self.state);
        axum::serve(listener, app).await?;
        Ok(())
    }
}
