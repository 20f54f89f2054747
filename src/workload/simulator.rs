//! Workload simulator implementation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::config::WorkloadConfig;
use crate::metrics::MetricsRecorder;
use crate::otel::OtelMeter;

const METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE"];
const ENDPOINTS: &[&str] = &["/users", "/orders", "/products", "/auth"];
const QUERY_TYPES: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE"];
const TABLES: &[&str] = &["users", "orders", "products"];
const PROTOCOLS: &[&str] = &["http", "grpc", "websocket"];
const REGIONS: &[&str] = &["heap", "stack", "cache"];
const QUEUES: &[&str] = &["high_priority", "normal", "low_priority"];

/// One simulated HTTP request.
struct HttpSample {
    method: &'static str,
    endpoint: &'static str,
    status: &'static str,
    error_type: Option<&'static str>,
    duration_secs: f64,
    response_bytes: f64,
}

/// One simulated database query.
struct DbSample {
    query_type: &'static str,
    table: &'static str,
    duration_secs: f64,
}

/// What one generation pass produced, for the endpoint response text.
#[derive(Debug, Clone, Copy)]
pub struct BatchSummary {
    pub http_samples: usize,
    pub db_samples: usize,
    pub payload_samples: usize,
}

/// Randomized workload source shared by the generation endpoints.
///
/// The RNG sits behind a mutex so concurrent generation requests interleave
/// draws instead of racing; with a fixed seed the combined draw sequence
/// stays reproducible.
#[derive(Clone)]
pub struct Simulator {
    config: WorkloadConfig,
    rng: Arc<Mutex<StdRng>>,
}

impl Simulator {
    pub fn new(config: WorkloadConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Simulator {
            config,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Runs a full generation pass against the Prometheus sink.
    pub fn generate_prometheus<M: MetricsRecorder>(&self, metrics: &M) -> BatchSummary {
        let mut rng = self.rng.lock().expect("workload rng poisoned");

        for _ in 0..self.config.http_samples {
            let sample = self.draw_http(&mut rng);
            metrics.record_http_request(
                sample.method,
                sample.endpoint,
                sample.status,
                sample.duration_secs,
                sample.response_bytes,
            );
            if let Some(error_type) = sample.error_type {
                metrics.record_http_error(sample.method, sample.endpoint, error_type);
            }
        }

        for _ in 0..self.config.db_samples {
            let sample = Self::draw_db(&mut rng);
            metrics.record_db_query(sample.query_type, sample.table, sample.duration_secs);
        }

        self.system_prometheus(metrics, &mut rng);

        for _ in 0..self.config.payload_samples {
            metrics.record_payload("inbound", rng.gen_range(100..=10_000) as f64);
            metrics.record_payload("outbound", rng.gen_range(500..=50_000) as f64);
        }

        debug!("generated Prometheus workload batch");
        self.summary()
    }

    /// Runs a full generation pass against the OTEL meter.
    pub fn generate_otel(&self, meter: &OtelMeter) -> BatchSummary {
        let mut rng = self.rng.lock().expect("workload rng poisoned");

        for _ in 0..self.config.http_samples {
            let sample = self.draw_http(&mut rng);
            let status_attrs = [
                ("method", sample.method),
                ("endpoint", sample.endpoint),
                ("status", sample.status),
            ];
            meter.add("http_requests_total", &status_attrs, 1.0);
            meter.observe(
                "http_request_duration_seconds",
                &status_attrs,
                sample.duration_secs,
            );
            meter.observe(
                "response_size_bytes",
                &[("endpoint", sample.endpoint)],
                sample.response_bytes,
            );
            if let Some(error_type) = sample.error_type {
                meter.add(
                    "http_errors_total",
                    &[
                        ("method", sample.method),
                        ("endpoint", sample.endpoint),
                        ("error_type", error_type),
                    ],
                    1.0,
                );
            }
        }

        for _ in 0..self.config.db_samples {
            let sample = Self::draw_db(&mut rng);
            meter.observe(
                "db_query_duration_seconds",
                &[("query_type", sample.query_type), ("table", sample.table)],
                sample.duration_secs,
            );
        }

        self.system_otel(meter, &mut rng);

        for _ in 0..self.config.payload_samples {
            meter.observe(
                "payload_size_bytes",
                &[("direction", "inbound")],
                rng.gen_range(100..=10_000) as f64,
            );
            meter.observe(
                "payload_size_bytes",
                &[("direction", "outbound")],
                rng.gen_range(500..=50_000) as f64,
            );
        }

        debug!("generated OTEL workload batch");
        self.summary()
    }

    /// Seeds both sinks with one round of system readings so the very first
    /// scrape after startup already has gauge values.
    pub fn seed_baseline<M: MetricsRecorder>(&self, metrics: &M, meter: &OtelMeter) {
        let mut rng = self.rng.lock().expect("workload rng poisoned");
        self.system_prometheus(metrics, &mut rng);
        self.system_otel(meter, &mut rng);
    }

    fn summary(&self) -> BatchSummary {
        BatchSummary {
            http_samples: self.config.http_samples,
            db_samples: self.config.db_samples,
            payload_samples: self.config.payload_samples,
        }
    }

    fn draw_http(&self, rng: &mut StdRng) -> HttpSample {
        let method = METHODS[rng.gen_range(0..METHODS.len())];
        let endpoint = ENDPOINTS[rng.gen_range(0..ENDPOINTS.len())];

        if rng.gen::<f64>() >= self.config.error_ratio {
            HttpSample {
                method,
                endpoint,
                status: "200",
                error_type: None,
                duration_secs: rng.gen_range(0.05..2.0),
                response_bytes: rng.gen_range(100..=50_000) as f64,
            }
        } else if rng.gen::<f64>() < 0.5 {
            HttpSample {
                method,
                endpoint,
                status: "404",
                error_type: Some("not_found"),
                duration_secs: rng.gen_range(0.01..0.1),
                response_bytes: rng.gen_range(100..=50_000) as f64,
            }
        } else {
            HttpSample {
                method,
                endpoint,
                status: "500",
                error_type: Some("internal_error"),
                duration_secs: rng.gen_range(0.5..5.0),
                response_bytes: rng.gen_range(100..=50_000) as f64,
            }
        }
    }

    fn draw_db(rng: &mut StdRng) -> DbSample {
        let query_type = QUERY_TYPES[rng.gen_range(0..QUERY_TYPES.len())];
        let table = TABLES[rng.gen_range(0..TABLES.len())];
        // Reads come from indexes; writes pay for fsync.
        let duration_secs = if query_type == "SELECT" {
            rng.gen_range(0.001..0.1)
        } else {
            rng.gen_range(0.005..0.2)
        };
        DbSample {
            query_type,
            table,
            duration_secs,
        }
    }

    fn system_prometheus<M: MetricsRecorder>(&self, metrics: &M, rng: &mut StdRng) {
        for &protocol in PROTOCOLS {
            metrics.set_active_connections(protocol, rng.gen_range(10..=100) as f64);
        }
        for &region in REGIONS {
            metrics.set_memory_usage(region, rng.gen_range(1_000_000..=50_000_000) as f64);
        }
        for &queue_name in QUEUES {
            metrics.set_queue_size(queue_name, rng.gen_range(0..=100) as f64);
        }
        metrics.set_cpu_usage(rng.gen_range(10.0..90.0));
        metrics.record_bytes_processed("upload", rng.gen_range(100_000..=1_000_000) as f64);
        metrics.record_bytes_processed("download", rng.gen_range(500_000..=5_000_000) as f64);
    }

    fn system_otel(&self, meter: &OtelMeter, rng: &mut StdRng) {
        for &protocol in PROTOCOLS {
            meter.set(
                "active_connections",
                &[("protocol", protocol)],
                rng.gen_range(10..=100) as f64,
            );
        }
        for &region in REGIONS {
            meter.set(
                "memory_usage_bytes",
                &[("region", region)],
                rng.gen_range(1_000_000..=50_000_000) as f64,
            );
        }
        for &queue_name in QUEUES {
            meter.set(
                "queue_size",
                &[("queue_name", queue_name)],
                rng.gen_range(0..=100) as f64,
            );
        }
        meter.set("cpu_usage_percent", &[], rng.gen_range(10.0..90.0));
        meter.add(
            "bytes_processed_total",
            &[("operation", "upload")],
            rng.gen_range(100_000..=1_000_000) as f64,
        );
        meter.add(
            "bytes_processed_total",
            &[("operation", "download")],
            rng.gen_range(500_000..=5_000_000) as f64,
        );
    }
}
