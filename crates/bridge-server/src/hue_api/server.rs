/// Hue API server implementation
use super::routes::{create_router, AppState};
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use hueshim_core::ResolvedConfig;

/// HTTP server for the description document and Hue API
pub struct ApiServer {
    config: Arc<ResolvedConfig>,
    server_handle: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
}

impl ApiServer {
    /// Create a new API server bound to the configured host and port.
    pub fn new(config: Arc<ResolvedConfig>) -> Self {
        Self {
            config,
            server_handle: None,
            local_addr: None,
        }
    }

    /// Bind the listener and start serving.
    pub async fn start(&mut self) -> Result<()> {
        let addr = SocketAddr::from((self.config.host_ip, self.config.listen_port));
        info!("Starting Hue API server on {}", addr);

        let app = create_router(AppState {
            config: self.config.clone(),
        });

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        self.local_addr = Some(local_addr);
        info!("Hue API listening on {}", local_addr);

        // Spawn server task
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Hue API server error: {}", e);
            }
        });

        self.server_handle = Some(handle);

        Ok(())
    }

    /// Stop the server.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.server_handle.take() {
            info!("Stopping Hue API server");
            handle.abort();
        }
    }

    /// Address actually bound; port 0 resolves to a real port after start.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        if let Some(handle) = self.server_handle.take() {
            handle.abort();
        }
    }
}
