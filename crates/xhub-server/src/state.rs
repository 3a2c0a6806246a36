use std::sync::Arc;

use xhub_resources::{ResourceResult, ResourceStore};

use crate::error::{ServerError, ServerResult};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    store: Arc<ResourceStore>,
}

impl AppState {
    pub fn new(store: ResourceStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    /// Run a store operation on the blocking pool.
    ///
    /// Storage calls hold a database lock and do file I/O, so they never run
    /// on the async executor.
    pub async fn run<T, F>(&self, op: F) -> ServerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&ResourceStore) -> ResourceResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| ServerError::Internal(format!("store task failed: {e}")))?
            .map_err(ServerError::from)
    }
}
