//! Route definitions for the AgriSmart advisory server

use axum::{routing::get, routing::post, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/advisory", advisory_routes())
}

/// Advisory report routes
fn advisory_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(handlers::create_report))
        .route("/reports/:file_name", get(handlers::download_report))
        .route("/recommendation", get(handlers::get_recommendation))
}
