//! Router configuration for the receiver

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::{AppState, handlers};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();
    let max_body_bytes = state.max_body_bytes;

    Router::new()
        // Front end
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(&static_dir))
        // Sender proxy
        .route("/request-screenshot", get(handlers::request_screenshot))
        // Cropped regions from the browser
        .route("/save-cropped", post(handlers::save_cropped))
        .route("/extract-table", post(handlers::extract_table))
        // Export
        .route("/download-csv", post(handlers::download_csv))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
