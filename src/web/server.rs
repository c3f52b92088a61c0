//! HTTP server bootstrap.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::file::{BlobStore, QuotaAccountant};
use crate::{Database, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_openapi_router, create_router};

/// Owns the listen address and application state until `run` is called.
pub struct WebServer {
    /// host:port to bind.
    addr: String,
    app_state: Arc<AppState>,
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Assemble the server from configuration and already-opened stores.
    ///
    /// Fails when the configured quota limit does not parse.
    pub fn new(config: &Config, db: Database, blobs: BlobStore) -> Result<Self> {
        let quota = QuotaAccountant::from_limit(&config.storage.quota_limit)?;
        let max_upload_size = config.storage.max_upload_size_mb * 1024 * 1024;

        let app_state = AppState::new(db, blobs, quota, max_upload_size);

        Ok(Self {
            addr: format!("{}:{}", config.server.host, config.server.port),
            app_state: Arc::new(app_state),
            cors_origins: config.server.cors_origins.clone(),
        })
    }

    /// The address the server will bind.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn router(&self) -> Router {
        create_router(self.app_state.clone(), &self.cors_origins)
            .merge(create_health_router())
            .merge(create_openapi_router())
    }

    async fn bind(&self) -> std::io::Result<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(&self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("HTTP API listening on http://{}", local_addr);
        Ok((listener, local_addr))
    }

    /// Serve until the process is stopped.
    pub async fn run(self) -> std::io::Result<()> {
        let router = self.router();
        let (listener, _) = self.bind().await?;
        axum::serve(listener, router).await
    }

    /// Serve in a background task and report the bound address.
    ///
    /// Binding port 0 picks a free port, which is what tests want.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let router = self.router();
        let (listener, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("HTTP server exited with error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn loopback_config() -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0; // Use random port
        config
    }

    async fn create_test_server() -> (WebServer, tempfile::TempDir) {
        let config = loopback_config();
        let db = Database::open_in_memory().await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path()).unwrap();

        (WebServer::new(&config, db, blobs).unwrap(), dir)
    }

    #[tokio::test]
    async fn test_new_uses_configured_addr() {
        let (server, _dir) = create_test_server().await;
        assert!(server.addr().starts_with("127.0.0.1:"));
    }

    #[tokio::test]
    async fn test_new_rejects_bad_quota() {
        let mut config = loopback_config();
        config.storage.quota_limit = "lots".to_string();
        let db = Database::open_in_memory().await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path()).unwrap();

        assert!(WebServer::new(&config, db, blobs).is_err());
    }

    #[tokio::test]
    async fn test_run_serves_health_endpoint() {
        let (server, _dir) = create_test_server().await;
        let addr = server.run_with_addr().await.unwrap();

        // Drive the socket by hand so the whole stack is exercised
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        let text = String::from_utf8_lossy(&response);

        assert!(text.starts_with("HTTP/1.1 200"));
        assert!(text.ends_with("OK"));
    }
}
