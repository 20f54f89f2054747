//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! the landing page, workload generation, exposition, and health checks.

mod generate_routes;
mod health_routes;
mod home_routes;
mod metrics_routes;

use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;
use axum::http::StatusCode;
use axum::Router;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and attaches
/// the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(home_routes::routes())
        .merge(generate_routes::routes())
        .merge(metrics_routes::routes())
        .merge(health_routes::routes())
        .fallback(not_found)
        .with_state(state)
}

/// Fallback for paths outside the endpoint catalog.
async fn not_found() -> HTTPError {
    HTTPError::new(StatusCode::NOT_FOUND, "Not Found")
}
