//! Broadcast pipeline: build a fresh snapshot, fan it out.
//!
//! Publishes and connects are serialized by `order`. A snapshot is read only
//! after taking the lock and is handed to every queue before the lock is
//! released, so clients see snapshots in the order they were read and a new
//! connection's initial snapshot precedes every later broadcast.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::registry::{ClientConnection, ConnectionRegistry};
use crate::snapshot::SnapshotBuilder;

pub struct Publisher {
    builder: SnapshotBuilder,
    registry: Arc<ConnectionRegistry>,
    order: Mutex<()>,
}

impl Publisher {
    pub fn new(builder: SnapshotBuilder, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            builder,
            registry,
            order: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Push the current state to every connection.
    ///
    /// Called after each committed mutation. Failures stay here: a snapshot
    /// that cannot be built is logged and skipped, dead connections are
    /// pruned by the registry.
    pub async fn publish_current_state(&self) {
        let _guard = self.order.lock().await;
        match self.builder.build().await {
            Ok(snapshot) => {
                let report = self.registry.broadcast(snapshot.text()).await;
                debug!(
                    kind = snapshot.kind(),
                    delivered = report.delivered,
                    pruned = report.pruned,
                    "Published current state"
                );
            }
            Err(e) => {
                warn!(error = %e, "Failed to build snapshot, broadcast skipped");
            }
        }
    }

    /// Register a new connection and queue the current state for it alone.
    ///
    /// Returns `false` if the initial snapshot could not be delivered; the
    /// connection is then unregistered and the caller should close it.
    pub async fn connect(&self, connection: Arc<ClientConnection>) -> bool {
        let _guard = self.order.lock().await;
        let id = connection.id;
        self.registry.register(Arc::clone(&connection)).await;

        let delivered = match self.builder.build().await {
            Ok(snapshot) => match connection.send(snapshot.text()) {
                Ok(()) => true,
                Err(e) => {
                    warn!(conn_id = %id, error = %e, "Failed to queue initial snapshot");
                    false
                }
            },
            Err(e) => {
                warn!(conn_id = %id, error = %e, "Failed to build initial snapshot");
                false
            }
        };

        if !delivered {
            self.registry.unregister(id).await;
        }
        delivered
    }
}
