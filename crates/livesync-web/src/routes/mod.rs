//! Route handlers.

pub mod classes;
pub mod courses;
pub mod data;
pub mod health;
pub mod items;

use axum::http::StatusCode;
use livesync_core::LiveSyncError;
use tracing::error;

/// Map a domain error to the status and body returned to the client.
pub(crate) fn error_response(err: LiveSyncError) -> (StatusCode, String) {
    match err {
        LiveSyncError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        e if e.is_not_found() => (StatusCode::NOT_FOUND, e.to_string()),
        e => {
            error!(error = %e, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
