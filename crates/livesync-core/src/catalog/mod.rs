//! Classes and courses.
//!
//! Courses reference classes by id through `class_ids`. The reference is not
//! enforced: deleting or renaming a class never touches courses.

pub mod model;

use crate::error::{LiveSyncError, LiveSyncResult};
use livesync_store::{DocumentStore, Fields};
use model::{CatalogData, Class, ClassPatch, Course, CoursePatch, CLASSES, COURSES};
use serde_json::Value;
use tracing::info;

/// Seed classes, inserted in this order.
const SEED_CLASSES: &[&str] = &["C1", "C2", "C3"];

/// Seed courses: subject and the indexes of its classes in `SEED_CLASSES`.
const SEED_COURSES: &[(&str, &[usize])] = &[("M", &[0, 1]), ("F", &[0]), ("D", &[1, 2])];

/// List all classes.
pub async fn list_classes(store: &dyn DocumentStore) -> LiveSyncResult<Vec<Class>> {
    let docs = store.find_all(CLASSES).await?;
    docs.iter()
        .map(|d| d.decode().map_err(LiveSyncError::from))
        .collect()
}

/// List all courses.
pub async fn list_courses(store: &dyn DocumentStore) -> LiveSyncResult<Vec<Course>> {
    let docs = store.find_all(COURSES).await?;
    docs.iter()
        .map(|d| d.decode().map_err(LiveSyncError::from))
        .collect()
}

/// Read both collections. Each is read independently; a write landing
/// between the two reads is not reconciled.
pub async fn get_catalog(store: &dyn DocumentStore) -> LiveSyncResult<CatalogData> {
    let classes = list_classes(store).await?;
    let courses = list_courses(store).await?;
    Ok(CatalogData { classes, courses })
}

/// Apply a partial update to a class and return its new state.
pub async fn update_class(
    store: &dyn DocumentStore,
    id: &str,
    patch: ClassPatch,
) -> LiveSyncResult<Class> {
    if patch.is_empty() {
        return Err(LiveSyncError::invalid_input("No fields to update"));
    }
    if !store.update_by_id(CLASSES, id, patch.into_fields()).await? {
        return Err(LiveSyncError::ClassNotFound(id.to_string()));
    }
    let doc = store
        .find_by_id(CLASSES, id)
        .await?
        .ok_or_else(|| LiveSyncError::ClassNotFound(id.to_string()))?;
    Ok(doc.decode()?)
}

/// Apply a partial update to a course and return its new state.
pub async fn update_course(
    store: &dyn DocumentStore,
    id: &str,
    patch: CoursePatch,
) -> LiveSyncResult<Course> {
    if patch.is_empty() {
        return Err(LiveSyncError::invalid_input("No fields to update"));
    }
    if !store.update_by_id(COURSES, id, patch.into_fields()).await? {
        return Err(LiveSyncError::CourseNotFound(id.to_string()));
    }
    let doc = store
        .find_by_id(COURSES, id)
        .await?
        .ok_or_else(|| LiveSyncError::CourseNotFound(id.to_string()))?;
    Ok(doc.decode()?)
}

/// Seed the catalog when both collections are empty. Returns whether it seeded.
pub async fn seed_if_empty(store: &dyn DocumentStore) -> LiveSyncResult<bool> {
    if store.count(CLASSES).await? > 0 || store.count(COURSES).await? > 0 {
        return Ok(false);
    }
    seed(store).await?;
    Ok(true)
}

/// Wipe both collections and insert the seed data again.
pub async fn reset(store: &dyn DocumentStore) -> LiveSyncResult<()> {
    let classes = store.delete_all(CLASSES).await?;
    let courses = store.delete_all(COURSES).await?;
    info!(classes, courses, "Catalog cleared");
    seed(store).await
}

async fn seed(store: &dyn DocumentStore) -> LiveSyncResult<()> {
    let mut class_ids = Vec::with_capacity(SEED_CLASSES.len());
    for alias in SEED_CLASSES {
        let mut fields = Fields::new();
        fields.insert("alias".to_string(), Value::String(alias.to_string()));
        class_ids.push(store.insert(CLASSES, fields).await?.id);
    }

    for (subject, members) in SEED_COURSES {
        let ids: Vec<Value> = members
            .iter()
            .map(|&i| Value::String(class_ids[i].clone()))
            .collect();
        let mut fields = Fields::new();
        fields.insert("subject".to_string(), Value::String(subject.to_string()));
        fields.insert("class_ids".to_string(), Value::Array(ids));
        store.insert(COURSES, fields).await?;
    }

    info!(
        classes = SEED_CLASSES.len(),
        courses = SEED_COURSES.len(),
        "Catalog seeded"
    );
    Ok(())
}
