//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! configuration, both metric sinks, and the workload simulator.

use crate::config::ConfigV1;
use crate::metrics::Metrics;
use crate::otel::OtelMeter;
use crate::workload::Simulator;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned per handler; every field is internally shared, so clones observe
/// the same registry, meter and RNG.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Prometheus registry and instruments.
    pub metrics: Metrics,
    /// OTEL-style meter backing the JSON snapshot endpoint.
    pub otel: OtelMeter,
    /// Workload simulator driven by the generation endpoints.
    pub workload: Simulator,
}
