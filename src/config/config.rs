use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::workload::WorkloadConfig;

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: bind address, logging, workload shape and the
/// identity stamped onto generated metrics.
#[derive(Deserialize, Serialize, Debug, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub workload: WorkloadConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Load config from a YAML file named "config.yaml" in the current directory,
/// with `PROMSIM_`-prefixed environment variables layered on top
/// (e.g. `PROMSIM_BIND_ADDRESS`, `PROMSIM_LOGGING__LEVEL`).
pub fn load_config() -> ConfigV1 {
    let figment = Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed("PROMSIM_").split("__"));
    let config = match figment.extract::<Config>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };
    match config {
        Config::ConfigV1(c) => c,
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}

/// Deploy-time identity, reported through the `app_info` metric and the
/// resource attributes of the OTEL snapshot.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct RuntimeConfig {
    pub environment: String,
    pub build_date: String,
    pub git_commit: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            environment: "production".to_string(),
            build_date: "2024-12-01".to_string(),
            git_commit: "abc123def".to_string(),
        }
    }
}
