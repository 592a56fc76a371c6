//! Connection registry: the live set of push connections and fan-out to them.
//!
//! Each connection owns a bounded outbound queue drained by its socket writer
//! task. Delivery never waits on a client: a queue that is full or whose
//! writer has gone away marks the connection dead, and it is removed during
//! the same broadcast (disconnect-on-overflow).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

/// Opaque connection identity.
pub type ConnectionId = Uuid;

/// Why a message could not be handed to a connection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("outbound queue full")]
    QueueFull,

    #[error("connection closed")]
    Closed,
}

/// One client's push channel.
#[derive(Debug)]
pub struct ClientConnection {
    pub id: ConnectionId,
    tx: mpsc::Sender<Arc<str>>,
}

impl ClientConnection {
    /// Create a connection with a fresh id feeding `tx`.
    pub fn new(tx: mpsc::Sender<Arc<str>>) -> Self {
        Self::with_id(Uuid::new_v4(), tx)
    }

    pub fn with_id(id: ConnectionId, tx: mpsc::Sender<Arc<str>>) -> Self {
        Self { id, tx }
    }

    /// Enqueue a message without waiting.
    pub fn send(&self, message: Arc<str>) -> Result<(), DeliveryError> {
        self.tx.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub pruned: usize,
}

/// Tracks open connections and delivers messages to all of them.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Arc<ClientConnection>>>,
    /// Mirrors the map size so counts never wait on the lock.
    active_count: AtomicUsize,
    broadcasts: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            active_count: AtomicUsize::new(0),
            broadcasts: AtomicU64::new(0),
        }
    }

    /// Add a connection. It receives every broadcast that starts afterwards.
    pub async fn register(&self, connection: Arc<ClientConnection>) {
        let mut conns = self.connections.write().await;
        if conns.insert(connection.id, connection).is_none() {
            self.active_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Remove a connection. Returns `false` if it was already gone.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut conns = self.connections.write().await;
        let removed = conns.remove(&id).is_some();
        if removed {
            self.active_count.fetch_sub(1, Ordering::Relaxed);
        }
        removed
    }

    /// Send `message` to every connection registered when the call starts.
    ///
    /// Membership is captured under the read lock and released before
    /// delivery; connections registered meanwhile may miss this message.
    /// Failed connections are unregistered and the failure is not returned.
    pub async fn broadcast(&self, message: Arc<str>) -> BroadcastReport {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);

        let targets: Vec<Arc<ClientConnection>> = {
            let conns = self.connections.read().await;
            conns.values().cloned().collect()
        };

        let mut report = BroadcastReport::default();
        for conn in targets {
            match conn.send(Arc::clone(&message)) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(conn_id = %conn.id, error = %e, "Dropping WebSocket client");
                    if self.unregister(conn.id).await {
                        report.pruned += 1;
                    }
                }
            }
        }

        debug!(
            delivered = report.delivered,
            pruned = report.pruned,
            bytes = message.len(),
            "Broadcast complete"
        );
        report
    }

    /// Whether `id` is currently registered.
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }

    /// Number of broadcasts issued since creation.
    pub fn broadcast_count(&self) -> u64 {
        self.broadcasts.load(Ordering::Relaxed)
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_connection(capacity: usize) -> (Arc<ClientConnection>, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Arc::new(ClientConnection::new(tx)), rx)
    }

    fn msg(text: &str) -> Arc<str> {
        Arc::from(text)
    }

    #[tokio::test]
    async fn register_and_unregister() {
        let registry = ConnectionRegistry::new();
        let (c1, _rx1) = make_connection(8);
        let (c2, _rx2) = make_connection(8);
        let (id1, id2) = (c1.id, c2.id);

        registry.register(c1).await;
        registry.register(c2).await;
        assert_eq!(registry.connection_count(), 2);
        assert!(registry.contains(id1).await);

        assert!(registry.unregister(id1).await);
        assert_eq!(registry.connection_count(), 1);
        assert!(!registry.contains(id1).await);
        assert!(registry.contains(id2).await);
    }

    #[tokio::test]
    async fn duplicate_unregister_is_noop() {
        let registry = ConnectionRegistry::new();
        let (c1, _rx) = make_connection(8);
        let id = c1.id;
        registry.register(c1).await;

        assert!(registry.unregister(id).await);
        assert!(!registry.unregister(id).await);
        assert!(!registry.unregister(Uuid::new_v4()).await);
        assert_eq!(registry.connection_count(), 0);
    }

    #[tokio::test]
    async fn broadcast_reaches_every_connection() {
        let registry = ConnectionRegistry::new();
        let (c1, mut rx1) = make_connection(8);
        let (c2, mut rx2) = make_connection(8);
        registry.register(c1).await;
        registry.register(c2).await;

        let report = registry.broadcast(msg("hello")).await;
        assert_eq!(report, BroadcastReport { delivered: 2, pruned: 0 });
        assert_eq!(&*rx1.try_recv().unwrap(), "hello");
        assert_eq!(&*rx2.try_recv().unwrap(), "hello");
    }

    #[tokio::test]
    async fn broadcast_shares_one_allocation() {
        let registry = ConnectionRegistry::new();
        let (c1, mut rx1) = make_connection(8);
        let (c2, mut rx2) = make_connection(8);
        registry.register(c1).await;
        registry.register(c2).await;

        registry.broadcast(msg("shared")).await;
        let m1 = rx1.recv().await.unwrap();
        let m2 = rx2.recv().await.unwrap();
        assert!(Arc::ptr_eq(&m1, &m2));
    }

    #[tokio::test]
    async fn broadcast_prunes_closed_connection() {
        let registry = ConnectionRegistry::new();
        let (dead, dead_rx) = make_connection(8);
        let (live, mut live_rx) = make_connection(8);
        let dead_id = dead.id;
        registry.register(dead).await;
        registry.register(live).await;
        drop(dead_rx);

        let report = registry.broadcast(msg("update")).await;
        assert_eq!(report, BroadcastReport { delivered: 1, pruned: 1 });
        assert!(!registry.contains(dead_id).await);
        assert_eq!(registry.connection_count(), 1);
        assert_eq!(&*live_rx.try_recv().unwrap(), "update");
    }

    #[tokio::test]
    async fn broadcast_disconnects_on_overflow() {
        let registry = ConnectionRegistry::new();
        let (slow, _slow_rx) = make_connection(1);
        let (fast, mut fast_rx) = make_connection(8);
        let slow_id = slow.id;
        registry.register(slow).await;
        registry.register(fast).await;

        // First message fills the slow client's queue.
        registry.broadcast(msg("one")).await;
        assert!(registry.contains(slow_id).await);

        let report = registry.broadcast(msg("two")).await;
        assert_eq!(report.pruned, 1);
        assert!(!registry.contains(slow_id).await);
        assert_eq!(&*fast_rx.try_recv().unwrap(), "one");
        assert_eq!(&*fast_rx.try_recv().unwrap(), "two");
    }

    #[tokio::test]
    async fn pruned_connection_gets_no_later_messages() {
        let registry = ConnectionRegistry::new();
        let (slow, mut slow_rx) = make_connection(1);
        registry.register(slow).await;

        registry.broadcast(msg("one")).await;
        registry.broadcast(msg("two")).await;
        registry.broadcast(msg("three")).await;

        assert_eq!(&*slow_rx.recv().await.unwrap(), "one");
        // The registry dropped its sender, so the queue is now closed.
        assert!(slow_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn broadcast_to_empty_registry() {
        let registry = ConnectionRegistry::new();
        let report = registry.broadcast(msg("nobody")).await;
        assert_eq!(report, BroadcastReport::default());
        assert_eq!(registry.broadcast_count(), 1);
    }

    #[tokio::test]
    async fn broadcast_count_tracks_calls() {
        let registry = ConnectionRegistry::default();
        assert_eq!(registry.broadcast_count(), 0);
        registry.broadcast(msg("a")).await;
        registry.broadcast(msg("b")).await;
        assert_eq!(registry.broadcast_count(), 2);
    }

    #[tokio::test]
    async fn concurrent_register_unregister_broadcast() {
        let registry = Arc::new(ConnectionRegistry::new());
        let mut handles = Vec::new();
        let mut receivers = Vec::new();

        for _ in 0..16 {
            let (conn, rx) = make_connection(64);
            receivers.push(rx);
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let id = conn.id;
                registry.register(conn).await;
                registry.broadcast(Arc::from("tick")).await;
                registry.unregister(id).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.connection_count(), 0);
        assert_eq!(registry.broadcast_count(), 16);
        // Every connection saw at least the broadcast issued by its own task.
        for mut rx in receivers {
            assert!(rx.try_recv().is_ok());
        }
    }

    #[test]
    fn send_reports_queue_state() {
        let (tx, rx) = mpsc::channel(1);
        let conn = ClientConnection::new(tx);
        assert_eq!(conn.send(msg("a")), Ok(()));
        assert_eq!(conn.send(msg("b")), Err(DeliveryError::QueueFull));
        drop(rx);
        assert_eq!(conn.send(msg("c")), Err(DeliveryError::Closed));
    }
}
