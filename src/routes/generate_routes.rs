//! Workload generation endpoints.

use crate::state::AppState;
use crate::workload::BatchSummary;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use tracing::info;

/// Registers the generation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/generatemetrics", get(generate_prometheus))
        .route("/generateotelmetrics", get(generate_otel))
}

/// Runs one workload pass against the Prometheus registry.
async fn generate_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let summary = state.workload.generate_prometheus(&state.metrics);
    info!(
        http = summary.http_samples,
        db = summary.db_samples,
        payload = summary.payload_samples,
        "Prometheus workload batch generated"
    );
    (
        StatusCode::OK,
        batch_report("Prometheus", &summary, "/metrics"),
    )
}

/// Runs one workload pass against the OTEL meter.
async fn generate_otel(State(state): State<AppState>) -> impl IntoResponse {
    let summary = state.workload.generate_otel(&state.otel);
    info!(
        http = summary.http_samples,
        db = summary.db_samples,
        payload = summary.payload_samples,
        "OTEL workload batch generated"
    );
    (
        StatusCode::OK,
        batch_report("OTEL", &summary, "/otelmetrics"),
    )
}

fn batch_report(flavor: &str, summary: &BatchSummary, view_path: &str) -> String {
    format!(
        "{flavor} metrics generated successfully!\n\n\
         Generated:\n\
         - {} HTTP request samples\n\
         - {} database query samples\n\
         - system metrics (connections, memory, CPU, queues)\n\
         - {} payload size samples\n\n\
         View metrics at: {view_path}\n",
        summary.http_samples, summary.db_samples, summary.payload_samples,
    )
}
