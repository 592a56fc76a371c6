//! LiveSync persistence gateway.
//!
//! A small document-store abstraction: collections of JSON documents
//! addressed by id. Redis backs production deployments; the in-memory
//! store serves tests and `--memory` runs.

pub mod client;
pub mod document;
pub mod memory;
pub mod redis_store;

pub use client::{init_pool, RedisPool, StoreError, StoreResult};
pub use document::{new_document_id, Document, DocumentStore, Fields};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
