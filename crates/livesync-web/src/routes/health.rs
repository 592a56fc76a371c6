//! Liveness endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::Dataset;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub dataset: Dataset,
    pub connections: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        dataset: state.config.dataset,
        connections: state.registry.connection_count(),
    })
}
