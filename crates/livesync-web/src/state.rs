//! Application state.

use livesync_store::DocumentStore;
use std::sync::Arc;
use tracing::error;

use crate::config::ServerConfig;
use crate::publisher::Publisher;
use crate::registry::ConnectionRegistry;
use crate::snapshot::SnapshotBuilder;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub registry: Arc<ConnectionRegistry>,
    pub publisher: Arc<Publisher>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire a fresh registry and publisher around `store`.
    pub fn new(store: Arc<dyn DocumentStore>, config: ServerConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let builder = SnapshotBuilder::new(config.dataset, Arc::clone(&store));
        let publisher = Arc::new(Publisher::new(builder, Arc::clone(&registry)));
        Self {
            store,
            registry,
            publisher,
            config: Arc::new(config),
        }
    }

    /// Push the current state to all WebSocket clients.
    ///
    /// Runs as its own task so the broadcast still happens if the request
    /// that committed the mutation is dropped. The caller waits for it.
    pub async fn publish_current_state(&self) {
        let publisher = Arc::clone(&self.publisher);
        let task = tokio::spawn(async move { publisher.publish_current_state().await });
        if let Err(e) = task.await {
            error!(error = %e, "Publish task failed");
        }
    }
}
