//! Exposition endpoints for both metric flavors.

use std::time::Duration;

use crate::state::AppState;
use crate::utils::log_throttle::should_emit;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use tracing::debug;

/// Creates the exposition routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/otelmetrics", get(otel_metrics_handler))
}

/// Handler for the /metrics endpoint.
///
/// Returns all collected metrics in Prometheus text format. Scrapers hit
/// this every few seconds, so the access log is throttled to one line per
/// window with a suppressed-count.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(suppressed) = should_emit("routes.metrics.scrape", Duration::from_secs(60)) {
        debug!(suppressed, "metrics endpoint scraped");
    }

    let metrics_text = state.metrics.render();

    (
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics_text,
    )
}

/// Handler for the /otelmetrics endpoint.
///
/// Returns the OTEL meter state as a resource/scope/metrics JSON document.
async fn otel_metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.otel.snapshot())
}
