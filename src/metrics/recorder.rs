//! Metrics recording implementation using Prometheus.

use prometheus::{
    register_counter_vec_with_registry, register_gauge_vec_with_registry,
    register_gauge_with_registry, register_histogram_vec_with_registry,
    register_int_gauge_vec_with_registry, CounterVec, Encoder, Gauge, GaugeVec, HistogramVec,
    IntGaugeVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use super::summary::SummaryVec;
use crate::config::RuntimeConfig;

/// Lifecycle states reported through the one-hot `app_state` metric.
pub const APP_STATES: &[&str] = &["starting", "running", "degraded", "shutting_down"];

/// Trait for recording synthetic workload samples.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records one simulated HTTP request: counter, latency histogram,
    /// latency summary and response size.
    fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status: &str,
        duration_secs: f64,
        response_bytes: f64,
    );

    /// Records a simulated HTTP failure by error class.
    fn record_http_error(&self, method: &str, endpoint: &str, error_type: &str);

    /// Records one simulated database query.
    fn record_db_query(&self, query_type: &str, table: &str, duration_secs: f64);

    /// Records processed byte throughput for an operation.
    fn record_bytes_processed(&self, operation: &str, bytes: f64);

    /// Records a payload size observation for a traffic direction.
    fn record_payload(&self, direction: &str, bytes: f64);

    /// Sets the current connection count for a protocol.
    fn set_active_connections(&self, protocol: &str, value: f64);

    /// Sets the current memory usage for a region.
    fn set_memory_usage(&self, region: &str, bytes: f64);

    /// Sets the current depth of a queue.
    fn set_queue_size(&self, queue_name: &str, value: f64);

    /// Sets the current CPU usage percentage.
    fn set_cpu_usage(&self, percent: f64);

    /// Moves the one-hot `app_state` metric to the given state.
    fn set_app_state(&self, state: &str);
}

/// Prometheus metrics collector holding every synthetic family.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    // Counters
    http_requests_total: CounterVec,
    http_errors_total: CounterVec,
    bytes_processed_total: CounterVec,

    // Gauges
    active_connections: GaugeVec,
    memory_usage_bytes: GaugeVec,
    queue_size: GaugeVec,
    cpu_usage_percent: Gauge,

    // Histograms
    http_request_duration_seconds: HistogramVec,
    db_query_duration_seconds: HistogramVec,
    response_size_bytes: HistogramVec,

    // Summaries
    request_duration_summary: SummaryVec,
    payload_size_summary: SummaryVec,

    // Info and state
    app_state: IntGaugeVec,
}

impl Metrics {
    /// Creates a new metrics instance with its own Prometheus registry.
    ///
    /// `app_info` is stamped once from the service version and runtime
    /// identity; `app_state` starts in `starting`.
    pub fn new(service_version: &str, runtime: &RuntimeConfig) -> Self {
        let registry = Arc::new(Registry::new());

        let http_requests_total = register_counter_vec_with_registry!(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["method", "endpoint", "status"],
            registry.clone()
        )
        .expect("Failed to register http_requests_total");

        let http_errors_total = register_counter_vec_with_registry!(
            Opts::new("http_errors_total", "Total HTTP errors"),
            &["method", "endpoint", "error_type"],
            registry.clone()
        )
        .expect("Failed to register http_errors_total");

        let bytes_processed_total = register_counter_vec_with_registry!(
            Opts::new("bytes_processed_total", "Total bytes processed"),
            &["operation"],
            registry.clone()
        )
        .expect("Failed to register bytes_processed_total");

        let active_connections = register_gauge_vec_with_registry!(
            Opts::new("active_connections", "Number of active connections"),
            &["protocol"],
            registry.clone()
        )
        .expect("Failed to register active_connections");

        let memory_usage_bytes = register_gauge_vec_with_registry!(
            Opts::new("memory_usage_bytes", "Current memory usage in bytes"),
            &["region"],
            registry.clone()
        )
        .expect("Failed to register memory_usage_bytes");

        let queue_size = register_gauge_vec_with_registry!(
            Opts::new("queue_size", "Current queue size"),
            &["queue_name"],
            registry.clone()
        )
        .expect("Failed to register queue_size");

        let cpu_usage_percent = register_gauge_with_registry!(
            Opts::new("cpu_usage_percent", "Current CPU usage percentage"),
            registry.clone()
        )
        .expect("Failed to register cpu_usage_percent");

        let http_request_duration_seconds = register_histogram_vec_with_registry!(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
            &["method", "endpoint", "status"],
            vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0],
            registry.clone()
        )
        .expect("Failed to register http_request_duration_seconds");

        let db_query_duration_seconds = register_histogram_vec_with_registry!(
            "db_query_duration_seconds",
            "Database query duration in seconds",
            &["query_type", "table"],
            vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
            registry.clone()
        )
        .expect("Failed to register db_query_duration_seconds");

        let response_size_bytes = register_histogram_vec_with_registry!(
            "response_size_bytes",
            "HTTP response size in bytes",
            &["endpoint"],
            vec![100.0, 1000.0, 10000.0, 100000.0, 1000000.0, 10000000.0],
            registry.clone()
        )
        .expect("Failed to register response_size_bytes");

        let request_duration_summary = SummaryVec::new(
            "request_duration_seconds_summary",
            "Request duration summary with quantiles",
            &["method", "endpoint"],
        )
        .expect("Failed to create request_duration_seconds_summary");
        registry
            .register(Box::new(request_duration_summary.clone()))
            .expect("Failed to register request_duration_seconds_summary");

        let payload_size_summary = SummaryVec::new(
            "payload_size_bytes_summary",
            "Payload size summary",
            &["direction"],
        )
        .expect("Failed to create payload_size_bytes_summary");
        registry
            .register(Box::new(payload_size_summary.clone()))
            .expect("Failed to register payload_size_bytes_summary");

        let app_info = register_int_gauge_vec_with_registry!(
            Opts::new("app_info", "Application information"),
            &["version", "environment", "build_date", "git_commit"],
            registry.clone()
        )
        .expect("Failed to register app_info");
        app_info
            .with_label_values(&[
                service_version,
                &runtime.environment,
                &runtime.build_date,
                &runtime.git_commit,
            ])
            .set(1);

        let app_state = register_int_gauge_vec_with_registry!(
            Opts::new("app_state", "Current application state"),
            &["app_state"],
            registry.clone()
        )
        .expect("Failed to register app_state");

        let metrics = Metrics {
            registry,
            http_requests_total,
            http_errors_total,
            bytes_processed_total,
            active_connections,
            memory_usage_bytes,
            queue_size,
            cpu_usage_percent,
            http_request_duration_seconds,
            db_query_duration_seconds,
            response_size_bytes,
            request_duration_summary,
            payload_size_summary,
            app_state,
        };
        metrics.set_app_state("starting");
        metrics
    }

    /// Renders all metrics in Prometheus text format.
    ///
    /// Vec families with no recorded children produce empty metric lists,
    /// which the text encoder rejects, so those are dropped here.
    pub fn render(&self) -> String {
        let mut metric_families = self.registry.gather();
        metric_families.retain(|mf| !mf.get_metric().is_empty());

        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .expect("Failed to encode metrics");
        String::from_utf8(buffer).expect("Metrics encoding produced invalid UTF-8")
    }
}

impl MetricsRecorder for Metrics {
    fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status: &str,
        duration_secs: f64,
        response_bytes: f64,
    ) {
        self.http_requests_total
            .with_label_values(&[method, endpoint, status])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, endpoint, status])
            .observe(duration_secs);
        self.request_duration_summary
            .observe(&[method, endpoint], duration_secs);
        self.response_size_bytes
            .with_label_values(&[endpoint])
            .observe(response_bytes);
    }

    fn record_http_error(&self, method: &str, endpoint: &str, error_type: &str) {
        self.http_errors_total
            .with_label_values(&[method, endpoint, error_type])
            .inc();
    }

    fn record_db_query(&self, query_type: &str, table: &str, duration_secs: f64) {
        self.db_query_duration_seconds
            .with_label_values(&[query_type, table])
            .observe(duration_secs);
    }

    fn record_bytes_processed(&self, operation: &str, bytes: f64) {
        self.bytes_processed_total
            .with_label_values(&[operation])
            .inc_by(bytes);
    }

    fn record_payload(&self, direction: &str, bytes: f64) {
        self.payload_size_summary.observe(&[direction], bytes);
    }

    fn set_active_connections(&self, protocol: &str, value: f64) {
        self.active_connections
            .with_label_values(&[protocol])
            .set(value);
    }

    fn set_memory_usage(&self, region: &str, bytes: f64) {
        self.memory_usage_bytes
            .with_label_values(&[region])
            .set(bytes);
    }

    fn set_queue_size(&self, queue_name: &str, value: f64) {
        self.queue_size.with_label_values(&[queue_name]).set(value);
    }

    fn set_cpu_usage(&self, percent: f64) {
        self.cpu_usage_percent.set(percent);
    }

    fn set_app_state(&self, state: &str) {
        for &known in APP_STATES {
            self.app_state
                .with_label_values(&[known])
                .set(i64::from(known == state));
        }
    }
}
