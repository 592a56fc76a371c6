//! Class route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use livesync_core::catalog::model::{Class, ClassPatch};

use super::error_response;
use crate::state::AppState;

pub async fn list_classes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Class>>, (StatusCode, String)> {
    let classes = livesync_core::catalog::list_classes(&*state.store)
        .await
        .map_err(error_response)?;

    Ok(Json(classes))
}

pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ClassPatch>,
) -> Result<Json<Class>, (StatusCode, String)> {
    let class = livesync_core::catalog::update_class(&*state.store, &id, patch)
        .await
        .map_err(error_response)?;

    state.publish_current_state().await;

    Ok(Json(class))
}
