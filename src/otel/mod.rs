//! OTEL-flavored metric instruments and JSON snapshots.
//!
//! There is no OTLP exporter here: the meter keeps instrument state
//! in-process and serves it as a resource/scope/metrics document, which is
//! what the snapshot endpoint returns.

mod meter;

pub use meter::{instruments, Instrument, InstrumentKind, OtelMeter, Snapshot};
