use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// WorkloadConfig shapes the synthetic traffic one generation pass produces.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Simulated HTTP requests per generation pass.
    pub http_samples: usize,
    /// Simulated database queries per generation pass.
    pub db_samples: usize,
    /// Simulated payload observations per generation pass.
    pub payload_samples: usize,
    /// Fraction of simulated HTTP requests that fail (0.0 ..= 1.0).
    pub error_ratio: f64,
    /// Fixed RNG seed. Leave unset for entropy-based seeding; set it to make
    /// generation passes reproducible.
    pub seed: Option<u64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            http_samples: 50,
            db_samples: 30,
            payload_samples: 20,
            error_ratio: 0.1,
            seed: None,
        }
    }
}
