//! Metrics collection and exposition for Prometheus.
//!
//! This module owns the synthetic metric families and their registry.

mod recorder;
mod summary;

pub use recorder::{Metrics, MetricsRecorder, APP_STATES};
pub use summary::SummaryVec;
