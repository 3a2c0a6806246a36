use std::sync::Arc;

use tokio::net::TcpListener;
use xhub_resources::ResourceStore;
use xhub_store::SqliteEngine;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Partition holding resource payloads.
pub const RESOURCES_PARTITION: &str = "resources";
/// Partition holding the study index.
pub const STUDY_INDEX_PARTITION: &str = "study_index";

/// xhub resource server.
pub struct XhubServer {
    config: ServerConfig,
    state: AppState,
}

impl XhubServer {
    /// Open the database named by `config` and prepare the server.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let engine = SqliteEngine::open(&config.db_path)?;
        let payloads = engine.partition(RESOURCES_PARTITION)?;
        let index = engine.partition(STUDY_INDEX_PARTITION)?;
        let store = ResourceStore::new(Arc::new(payloads), Arc::new(index))
            .with_base_url(config.base_url());
        Ok(Self::with_store(config, store))
    }

    /// A server over an existing store (useful for testing).
    pub fn with_store(config: ServerConfig, store: ResourceStore) -> Self {
        Self {
            config,
            state: AppState::new(store),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            db = %self.config.db_path.display(),
            "xhub server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
