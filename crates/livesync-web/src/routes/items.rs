//! Item route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use livesync_core::items::model::{Item, ItemPatch, NewItem};

use super::error_response;
use crate::state::AppState;

pub async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<Item>>, (StatusCode, String)> {
    let items = livesync_core::items::list_items(&*state.store)
        .await
        .map_err(error_response)?;

    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, (StatusCode, String)> {
    let item = livesync_core::items::get_item(&*state.store, &id)
        .await
        .map_err(error_response)?;

    Ok(Json(item))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(req): Json<NewItem>,
) -> Result<(StatusCode, Json<Item>), (StatusCode, String)> {
    let item = livesync_core::items::create_item(&*state.store, req)
        .await
        .map_err(error_response)?;

    state.publish_current_state().await;

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ItemPatch>,
) -> Result<Json<Item>, (StatusCode, String)> {
    let item = livesync_core::items::update_item(&*state.store, &id, patch)
        .await
        .map_err(error_response)?;

    state.publish_current_state().await;

    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    livesync_core::items::delete_item(&*state.store, &id)
        .await
        .map_err(error_response)?;

    state.publish_current_state().await;

    Ok(StatusCode::NO_CONTENT)
}
