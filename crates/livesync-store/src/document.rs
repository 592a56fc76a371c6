//! Documents and the store contract.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::client::StoreResult;

/// The JSON object holding a document's fields (everything except its id).
pub type Fields = serde_json::Map<String, Value>;

/// A stored document: an identity plus a JSON object of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decode the document into a typed record.
    ///
    /// The id is injected as an `id` field, so record types declare it like
    /// any other field.
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        let mut map = self.fields.clone();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    /// Shallow-merge `patch` into this document's fields.
    pub fn merge(&mut self, patch: Fields) {
        for (key, value) in patch {
            self.fields.insert(key, value);
        }
    }
}

/// Generate a fresh document id.
pub fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Document store consumed by the domain layer.
///
/// Every write reports whether its target existed so callers can surface
/// "not found" without a second read.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection, in insertion order.
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Insert a new document and return it with its generated id.
    async fn insert(&self, collection: &str, fields: Fields) -> StoreResult<Document>;

    /// Merge `fields` into an existing document. Returns `false` if no document matched.
    async fn update_by_id(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<bool>;

    /// Returns `false` if no document matched.
    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Remove every document of a collection, returning how many were removed.
    async fn delete_all(&self, collection: &str) -> StoreResult<u64>;

    async fn count(&self, collection: &str) -> StoreResult<u64>;
}
