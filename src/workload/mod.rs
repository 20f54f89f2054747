//! Synthetic workload generation.
//!
//! Draws randomized HTTP traffic, database queries, system readings and
//! payload sizes, and feeds them into the metric sinks.

mod simulator;

pub use simulator::{BatchSummary, Simulator};
