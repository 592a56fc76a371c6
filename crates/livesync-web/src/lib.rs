//! LiveSync Web Server
//!
//! Axum-based REST API plus a WebSocket push channel. Every successful
//! mutation re-publishes the full dataset to all connected clients.

pub mod config;
pub mod publisher;
pub mod registry;
pub mod routes;
pub mod snapshot;
pub mod state;
pub mod websocket;

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use livesync_store::DocumentStore;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub use config::{Dataset, ServerConfig};
use state::AppState;

/// Create the application router for the configured dataset.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&state.config.allowed_origins))
        .allow_methods(Any)
        .allow_headers(Any);

    let dataset_routes = match state.config.dataset {
        Dataset::Items => item_routes(),
        Dataset::Catalog => catalog_routes(),
    };

    Router::new()
        .merge(dataset_routes)
        .route("/ws", get(websocket::ws_handler))
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn item_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(routes::items::list_items).post(routes::items::create_item),
        )
        .route(
            "/items/{id}",
            get(routes::items::get_item)
                .put(routes::items::update_item)
                .delete(routes::items::delete_item),
        )
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/data", get(routes::data::get_data))
        .route("/reset-data", post(routes::data::reset_data))
        .route("/classes", get(routes::classes::list_classes))
        .route("/classes/{id}", put(routes::classes::update_class))
        .route("/courses", get(routes::courses::list_courses))
        .route("/courses/{id}", put(routes::courses::update_course))
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|o| o == "*") {
        return AllowOrigin::any();
    }
    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(values)
}

/// Run the web server until Ctrl+C.
pub async fn run_server(store: Arc<dyn DocumentStore>, config: ServerConfig) -> anyhow::Result<()> {
    if config.dataset == Dataset::Catalog
        && config.seed
        && livesync_core::catalog::seed_if_empty(&*store).await?
    {
        info!("Seeded empty catalog");
    }

    let addr = config.bind_addr();
    let dataset = config.dataset;
    let state = AppState::new(store, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%dataset, "Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
