//! Full-state snapshots pushed over the WebSocket.

use std::sync::Arc;

use livesync_core::catalog::model::CatalogData;
use livesync_core::items::model::Item;
use livesync_core::LiveSyncResult;
use livesync_store::DocumentStore;
use serde::{Deserialize, Serialize};

use crate::config::Dataset;

/// Push message: `{"type": "<kind>", "payload": <full state>}`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SyncMessage {
    /// Every item.
    ItemsUpdated(Vec<Item>),
    /// Every class and course.
    DataUpdated(CatalogData),
}

impl SyncMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ItemsUpdated(_) => "items_updated",
            Self::DataUpdated(_) => "data_updated",
        }
    }
}

/// A serialized [`SyncMessage`]. Immutable; cheap to clone and fan out.
#[derive(Clone, Debug)]
pub struct Snapshot {
    kind: &'static str,
    text: Arc<str>,
}

impl Snapshot {
    pub fn from_message(message: &SyncMessage) -> LiveSyncResult<Self> {
        let json = serde_json::to_string(message)?;
        Ok(Self {
            kind: message.kind(),
            text: Arc::from(json),
        })
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Shared handle to the serialized text.
    pub fn text(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }
}

/// Reads the current state of one dataset and serializes it.
#[derive(Clone)]
pub struct SnapshotBuilder {
    dataset: Dataset,
    store: Arc<dyn DocumentStore>,
}

impl SnapshotBuilder {
    pub fn new(dataset: Dataset, store: Arc<dyn DocumentStore>) -> Self {
        Self { dataset, store }
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    /// Read the whole dataset from the store. Never cached.
    pub async fn build(&self) -> LiveSyncResult<Snapshot> {
        let message = match self.dataset {
            Dataset::Items => {
                SyncMessage::ItemsUpdated(livesync_core::items::list_items(&*self.store).await?)
            }
            Dataset::Catalog => {
                SyncMessage::DataUpdated(livesync_core::catalog::get_catalog(&*self.store).await?)
            }
        };
        Snapshot::from_message(&message)
    }
}
