//! HTTP server lifecycle
//!
//! Wraps an Axum router with bound-address bookkeeping and graceful
//! shutdown through a `CancellationToken`.

use axum::Router;
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::{Result, ServerError};
use crate::shutdown::ShutdownController;

/// Listen address for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port to bind to; 0 picks an ephemeral port
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

/// HTTP server with graceful shutdown
#[derive(Clone)]
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
    running: Arc<AtomicBool>,
    bound_addr: Arc<RwLock<Option<SocketAddr>>>,
}

impl HttpServer {
    /// Create a server around a router
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self {
            config,
            router,
            running: Arc::new(AtomicBool::new(false)),
            bound_addr: Arc::new(RwLock::new(None)),
        }
    }

    /// The address the server is bound to, once running
    pub fn address(&self) -> Option<SocketAddr> {
        *self.bound_addr.read()
    }

    /// Whether the server is currently accepting connections
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run until the shutdown token is cancelled
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let addr = self.config.addr()?;
        info!(%addr, "Starting HTTP server");

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::bind(addr.to_string(), e))?;
        let local_addr = listener.local_addr().map_err(ServerError::Io)?;

        *self.bound_addr.write() = Some(local_addr);
        self.running.store(true, Ordering::SeqCst);
        info!(%local_addr, "HTTP server listening");

        let result = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                info!("HTTP server received shutdown signal");
            })
            .await;

        self.running.store(false, Ordering::SeqCst);
        *self.bound_addr.write() = None;

        match result {
            Ok(()) => {
                info!("HTTP server shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!(%e, "HTTP server error");
                Err(ServerError::Io(e))
            }
        }
    }

    /// Run the server on a background task; returns the handle and a token
    /// that stops it
    pub fn spawn(self) -> (JoinHandle<Result<()>>, CancellationToken) {
        let token = CancellationToken::new();
        let run_token = token.clone();
        let handle = tokio::spawn(async move { self.run(run_token).await });
        (handle, token)
    }

    /// Run in the foreground until Ctrl+C
    pub async fn run_with_ctrl_c(self) -> Result<()> {
        let shutdown = ShutdownController::with_ctrl_c();
        self.run(shutdown.token()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::time::Duration;

    #[tokio::test]
    async fn test_server_stops_on_shutdown() {
        let router = Router::new().route("/", get(|| async { "ok" }));
        let server = HttpServer::new(ServerConfig::new("127.0.0.1", 0), router);

        let (handle, token) = server.spawn();
        tokio::time::sleep(Duration::from_millis(100)).await;

        token.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(result.is_ok(), "server should shut down within the timeout");
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let config = ServerConfig::new("not a host", 8080);
        assert!(config.addr().is_err());
    }
}
