//! API route definitions and router builder.

pub mod ask;
pub mod devices;
pub mod health;
pub mod reports;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Report ingestion
        .route("/reports", post(reports::ingest_report))
        // Operator questions
        .route("/ask", post(ask::ask))
        // Device state
        .route("/devices", get(devices::list_devices))
        .route("/devices/{id}", get(devices::get_device));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
