//! Course route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use livesync_core::catalog::model::{Course, CoursePatch};

use super::error_response;
use crate::state::AppState;

pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, (StatusCode, String)> {
    let courses = livesync_core::catalog::list_courses(&*state.store)
        .await
        .map_err(error_response)?;

    Ok(Json(courses))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CoursePatch>,
) -> Result<Json<Course>, (StatusCode, String)> {
    let course = livesync_core::catalog::update_course(&*state.store, &id, patch)
        .await
        .map_err(error_response)?;

    state.publish_current_state().await;

    Ok(Json(course))
}
