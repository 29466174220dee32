//! HTTP server setup

use std::io;
use std::path::PathBuf;

use axum::Router;
use serde::{Deserialize, Serialize};
use stroo_generation::GenerationConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::{routes, state::AppState};

/// Server settings, loaded from the `server` section of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
    /// Directory with the playground UI and example files
    pub assets_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            assets_dir: PathBuf::from("./server"),
        }
    }
}

/// The interactive service
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a server with an empty cache
    pub fn new(config: ServerConfig, generation: GenerationConfig) -> Self {
        let state = AppState::new(generation, config.assets_dir.clone());
        Self { config, state }
    }

    /// Router serving this server's state
    pub fn router(&self) -> Router {
        routes::app(self.state.clone())
    }

    /// Bind and serve until Ctrl-C
    pub async fn run(self) -> io::Result<()> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!(
            "Serving on http://{} (assets from {})",
            listener.local_addr()?,
            self.config.assets_dir.display()
        );
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
