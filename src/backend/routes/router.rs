/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Health check
 * 2. API routes (auth, admin, posts)
 * 3. JSON 404 fallback
 *
 * Every request is traced with `tower_http::trace::TraceLayer`.
 */

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;
use crate::backend::storage::{BackendKind, Storage};

/// Body of `GET /health`
#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: BackendKind,
}

/// Liveness probe reporting the selected storage backend
pub async fn health(State(storage): State<Storage>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        backend: storage.kind(),
    })
}

async fn not_found() -> BackendError {
    BackendError::not_found("Not found")
}

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state containing storage and session services
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));

    // Add API routes
    let router = configure_api_routes(router);

    router
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
