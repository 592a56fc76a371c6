//! Redis-backed document store.
//!
//! Layout per collection:
//! - `{ns}:{collection}:doc:{id}`: hash, field `data` holds the JSON fields
//! - `{ns}:{collection}:all`: sorted set of ids, scored by insertion sequence
//! - `{ns}:{collection}:seq`: insertion sequence counter

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use crate::client::{init_pool, RedisPool, StoreError, StoreResult};
use crate::document::{new_document_id, Document, DocumentStore, Fields};

/// Replace a document's data only if it still holds ARGV[1].
/// Returns 1 on write, 0 if the document is gone, -1 if it changed.
const COMPARE_AND_SET: &str = r#"
local current = redis.call('HGET', KEYS[1], 'data')
if not current then
    return 0
end
if current ~= ARGV[1] then
    return -1
end
redis.call('HSET', KEYS[1], 'data', ARGV[2])
return 1
"#;

const UPDATE_ATTEMPTS: usize = 8;

/// Document store over a Redis connection manager.
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
    namespace: String,
    compare_and_set: redis::Script,
}

impl RedisStore {
    pub fn new(pool: RedisPool, namespace: impl Into<String>) -> Self {
        Self {
            pool,
            namespace: namespace.into(),
            compare_and_set: redis::Script::new(COMPARE_AND_SET),
        }
    }

    /// Connect to `redis_url` and scope all keys under `namespace`.
    pub async fn connect(redis_url: &str, namespace: &str) -> StoreResult<Self> {
        let pool = init_pool(redis_url).await?;
        debug!(namespace, "Redis store connected");
        Ok(Self::new(pool, namespace))
    }

    fn doc_key(&self, collection: &str, id: &str) -> String {
        format!("{}:{}:doc:{}", self.namespace, collection, id)
    }

    fn index_key(&self, collection: &str) -> String {
        format!("{}:{}:all", self.namespace, collection)
    }

    fn seq_key(&self, collection: &str) -> String {
        format!("{}:{}:seq", self.namespace, collection)
    }

    async fn load_raw(&self, collection: &str, id: &str) -> StoreResult<Option<String>> {
        let mut conn = self.pool.clone();
        let json: Option<String> = conn.hget(self.doc_key(collection, id), "data").await?;
        Ok(json)
    }

    async fn load(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        match self.load_raw(collection, id).await? {
            Some(json) => Ok(Some(decode(collection, id, &json)?)),
            None => Ok(None),
        }
    }
}

fn decode(collection: &str, id: &str, json: &str) -> StoreResult<Document> {
    let fields: Fields = serde_json::from_str(json).map_err(|_| StoreError::Malformed {
        collection: collection.to_string(),
        id: id.to_string(),
    })?;
    Ok(Document::new(id, fields))
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let mut conn = self.pool.clone();
        let ids: Vec<String> = conn.zrange(self.index_key(collection), 0, -1).await?;
        let mut docs = Vec::with_capacity(ids.len());
        for id in ids {
            // An index entry can outlive its hash if a delete raced this read.
            if let Some(doc) = self.load(collection, &id).await? {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.load(collection, id).await
    }

    async fn insert(&self, collection: &str, fields: Fields) -> StoreResult<Document> {
        let mut conn = self.pool.clone();
        let id = new_document_id();
        let json = serde_json::to_string(&fields)?;
        let seq: i64 = conn.incr(self.seq_key(collection), 1).await?;

        let _: () = redis::pipe()
            .atomic()
            .hset(self.doc_key(collection, &id), "data", &json)
            .ignore()
            .zadd(self.index_key(collection), &id, seq)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(Document::new(id, fields))
    }

    /// Merge `fields` into the stored document.
    ///
    /// The write only lands if the document still holds what was read, so a
    /// concurrent delete is never undone and concurrent patches never drop
    /// each other's fields. A changed document is re-read and merged again.
    async fn update_by_id(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<bool> {
        let mut conn = self.pool.clone();
        let key = self.doc_key(collection, id);

        for attempt in 1..=UPDATE_ATTEMPTS {
            let Some(current) = self.load_raw(collection, id).await? else {
                return Ok(false);
            };
            let mut doc = decode(collection, id, &current)?;
            doc.merge(fields.clone());
            let next = serde_json::to_string(&doc.fields)?;

            let outcome: i64 = self
                .compare_and_set
                .key(&key)
                .arg(&current)
                .arg(&next)
                .invoke_async(&mut conn)
                .await?;
            match outcome {
                1 => return Ok(true),
                0 => return Ok(false),
                _ => debug!(collection, id, attempt, "Document changed during update, retrying"),
            }
        }

        Err(StoreError::Conflict {
            collection: collection.to_string(),
            id: id.to_string(),
        })
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut conn = self.pool.clone();
        let (removed, _): (i64, i64) = redis::pipe()
            .atomic()
            .del(self.doc_key(collection, id))
            .zrem(self.index_key(collection), id)
            .query_async(&mut conn)
            .await?;
        Ok(removed > 0)
    }

    async fn delete_all(&self, collection: &str) -> StoreResult<u64> {
        let mut conn = self.pool.clone();
        let ids: Vec<String> = conn.zrange(self.index_key(collection), 0, -1).await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for id in &ids {
            pipe.del(self.doc_key(collection, id)).ignore();
        }
        pipe.del(self.index_key(collection)).ignore();
        let _: () = pipe.query_async(&mut conn).await?;

        Ok(ids.len() as u64)
    }

    async fn count(&self, collection: &str) -> StoreResult<u64> {
        let mut conn = self.pool.clone();
        let n: u64 = conn.zcard(self.index_key(collection)).await?;
        Ok(n)
    }
}
