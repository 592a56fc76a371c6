//! To-do item management.

pub mod model;

use crate::error::{LiveSyncError, LiveSyncResult};
use livesync_store::{DocumentStore, Fields};
use model::{Item, ItemPatch, NewItem, COLLECTION};
use serde_json::Value;
use tracing::debug;

/// List all items in insertion order.
pub async fn list_items(store: &dyn DocumentStore) -> LiveSyncResult<Vec<Item>> {
    let docs = store.find_all(COLLECTION).await?;
    docs.iter()
        .map(|d| d.decode().map_err(LiveSyncError::from))
        .collect()
}

/// Get an item by ID.
pub async fn get_item(store: &dyn DocumentStore, id: &str) -> LiveSyncResult<Item> {
    let doc = store
        .find_by_id(COLLECTION, id)
        .await?
        .ok_or_else(|| LiveSyncError::ItemNotFound(id.to_string()))?;
    Ok(doc.decode()?)
}

/// Create a new item. The title is trimmed and must not be blank.
pub async fn create_item(store: &dyn DocumentStore, new: NewItem) -> LiveSyncResult<Item> {
    let title = validate_title(&new.title)?;

    let mut fields = Fields::new();
    fields.insert("title".to_string(), Value::String(title));
    fields.insert("completed".to_string(), Value::Bool(new.completed));

    let doc = store.insert(COLLECTION, fields).await?;
    debug!(item_id = %doc.id, "Item created");
    Ok(doc.decode()?)
}

/// Apply a partial update to an item and return its new state.
pub async fn update_item(
    store: &dyn DocumentStore,
    id: &str,
    mut patch: ItemPatch,
) -> LiveSyncResult<Item> {
    if patch.is_empty() {
        return Err(LiveSyncError::invalid_input("No fields to update"));
    }
    if let Some(title) = patch.title.as_deref() {
        patch.title = Some(validate_title(title)?);
    }

    if !store.update_by_id(COLLECTION, id, patch.into_fields()).await? {
        return Err(LiveSyncError::ItemNotFound(id.to_string()));
    }
    get_item(store, id).await
}

/// Delete an item.
pub async fn delete_item(store: &dyn DocumentStore, id: &str) -> LiveSyncResult<()> {
    if !store.delete_by_id(COLLECTION, id).await? {
        return Err(LiveSyncError::ItemNotFound(id.to_string()));
    }
    debug!(item_id = %id, "Item deleted");
    Ok(())
}

fn validate_title(title: &str) -> LiveSyncResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(LiveSyncError::invalid_input("Title must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CountingStore;
    use livesync_store::MemoryStore;

    #[tokio::test]
    async fn test_create_then_list_reflects_write() {
        let store = MemoryStore::new();
        let created = create_item(&store, NewItem::new("Buy milk")).await.unwrap();

        let items = list_items(&store).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0], created);
        assert_eq!(items[0].title, "Buy milk");
        assert!(!items[0].completed);
    }

    #[tokio::test]
    async fn test_create_trims_title() {
        let store = MemoryStore::new();
        let item = create_item(&store, NewItem::new("  Walk dog \n")).await.unwrap();
        assert_eq!(item.title, "Walk dog");
    }

    #[tokio::test]
    async fn test_create_blank_title_rejected_without_write() {
        let store = CountingStore::default();
        let err = create_item(&store, NewItem::new("   ")).await.unwrap_err();
        assert!(matches!(err, LiveSyncError::InvalidInput(_)));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_update_toggles_completed() {
        let store = MemoryStore::new();
        let item = create_item(&store, NewItem::new("Buy milk")).await.unwrap();

        let patch = ItemPatch {
            completed: Some(true),
            ..Default::default()
        };
        let updated = update_item(&store, &item.id, patch).await.unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "Buy milk");
    }

    #[tokio::test]
    async fn test_update_empty_patch_rejected_before_write() {
        let store = CountingStore::default();
        let item = create_item(&store, NewItem::new("Buy milk")).await.unwrap();
        let writes = store.writes();

        let err = update_item(&store, &item.id, ItemPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LiveSyncError::InvalidInput(_)));
        assert_eq!(store.writes(), writes);
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let store = MemoryStore::new();
        let patch = ItemPatch {
            title: Some("x".to_string()),
            ..Default::default()
        };
        let err = update_item(&store, "missing", patch).await.unwrap_err();
        assert!(matches!(err, LiveSyncError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_item() {
        let store = MemoryStore::new();
        let item = create_item(&store, NewItem::new("Buy milk")).await.unwrap();

        delete_item(&store, &item.id).await.unwrap();
        assert!(list_items(&store).await.unwrap().is_empty());

        let err = delete_item(&store, &item.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_item_not_found() {
        let store = MemoryStore::new();
        let err = get_item(&store, "nope").await.unwrap_err();
        assert!(matches!(err, LiveSyncError::ItemNotFound(id) if id == "nope"));
    }
}
