//! Application startup and server initialization.
//!
//! This module handles the creation and configuration of the HTTP server,
//! including construction of both metric sinks, the workload simulator,
//! and route setup.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ConfigV1;
use crate::metrics::{Metrics, MetricsRecorder};
use crate::otel::OtelMeter;
use crate::routes;
use crate::state::AppState;
use crate::workload::Simulator;

/// Initializes and runs the application server.
///
/// Builds the metric sinks, seeds the baseline system readings so the first
/// scrape is already populated, and serves the configured routes until a
/// shutdown signal arrives. The `app_state` metric tracks the lifecycle:
/// `starting` during construction, `running` while serving, and
/// `shutting_down` once the signal lands.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the specified address
/// or encounters a runtime error during execution.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Metrics::new(&config.logging.service_version, &config.runtime);
    let otel = OtelMeter::new(
        &config.logging.service_name,
        &config.logging.service_version,
        &config.runtime.environment,
    );
    let workload = Simulator::new(config.workload.clone());

    workload.seed_baseline(&metrics, &otel);
    metrics.set_app_state("running");

    info!("Starting server on {}", config.bind_address);

    let state = AppState {
        config: config.clone(),
        metrics: metrics.clone(),
        otel,
        workload,
    };

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .expect("Could not bind to specified address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(metrics))
        .await?;

    Ok(())
}

/// Resolves when SIGINT arrives, flipping the lifecycle metric first so a
/// final scrape can observe the transition.
async fn shutdown_signal(metrics: Metrics) {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    info!("Shutdown signal received, draining connections");
    metrics.set_app_state("shutting_down");
}
