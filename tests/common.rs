use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use promsim::config::{Config, ConfigV1};
use promsim::metrics::{Metrics, MetricsRecorder};
use promsim::otel::OtelMeter;
use promsim::routes::create_router;
use promsim::state::AppState;
use promsim::workload::Simulator;

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:8000
logging:
  level: "debug"
  format: "json"
  service_name: "promsim-test"
  service_version: "0.0.1"
workload:
  http_samples: 40
  db_samples: 15
  payload_samples: 10
  error_ratio: 0.25
  seed: 42
runtime:
  environment: "test"
  build_date: "2026-01-01"
  git_commit: "deadbeef"
"#;

pub fn load_test_config() -> ConfigV1 {
    let config: Config = Figment::new()
        .merge(Yaml::string(TEST_CONFIG))
        .extract()
        .expect("Failed to parse test config YAML");

    match config {
        Config::ConfigV1(cfg) => cfg,
    }
}

pub fn build_app(config: ConfigV1) -> (Router, AppState) {
    let config = Arc::new(config);
    let metrics = Metrics::new(&config.logging.service_version, &config.runtime);
    let otel = OtelMeter::new(
        &config.logging.service_name,
        &config.logging.service_version,
        &config.runtime.environment,
    );
    let workload = Simulator::new(config.workload.clone());

    workload.seed_baseline(&metrics, &otel);
    metrics.set_app_state("running");

    let state = AppState {
        config: config.clone(),
        metrics,
        otel,
        workload,
    };

    (create_router(state.clone()), state)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}
