//! Whole-catalog endpoints.

use axum::{extract::State, http::StatusCode, Json};
use livesync_core::catalog::model::CatalogData;
use serde::Serialize;
use tracing::info;

use super::error_response;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn get_data(
    State(state): State<AppState>,
) -> Result<Json<CatalogData>, (StatusCode, String)> {
    let data = livesync_core::catalog::get_catalog(&*state.store)
        .await
        .map_err(error_response)?;

    Ok(Json(data))
}

/// Wipe and reseed the catalog, then push the new state.
pub async fn reset_data(
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>, (StatusCode, String)> {
    livesync_core::catalog::reset(&*state.store)
        .await
        .map_err(error_response)?;
    info!("Catalog reset requested over HTTP");

    state.publish_current_state().await;

    Ok(Json(ResetResponse {
        status: "OK",
        message: "Database reset and seeded.",
    }))
}
