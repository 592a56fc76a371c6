//! Test doubles shared by the domain tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use livesync_store::{Document, DocumentStore, Fields, MemoryStore, StoreResult};

/// Wraps a [`MemoryStore`] and counts every write that reaches it.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.inner.find_all(collection).await
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.inner.find_by_id(collection, id).await
    }

    async fn insert(&self, collection: &str, fields: Fields) -> StoreResult<Document> {
        self.record_write();
        self.inner.insert(collection, fields).await
    }

    async fn update_by_id(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<bool> {
        self.record_write();
        self.inner.update_by_id(collection, id, fields).await
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool> {
        self.record_write();
        self.inner.delete_by_id(collection, id).await
    }

    async fn delete_all(&self, collection: &str) -> StoreResult<u64> {
        self.record_write();
        self.inner.delete_all(collection).await
    }

    async fn count(&self, collection: &str) -> StoreResult<u64> {
        self.inner.count(collection).await
    }
}
