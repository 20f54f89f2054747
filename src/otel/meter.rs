//! In-process OTEL-style meter.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::warn;
use uuid::Uuid;

type Attributes = BTreeMap<String, String>;

/// Instrument kinds the meter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    Counter,
    ObservableGauge,
    Histogram,
}

impl InstrumentKind {
    fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Counter => "Counter",
            InstrumentKind::ObservableGauge => "Observable Gauge",
            InstrumentKind::Histogram => "Histogram",
        }
    }
}

/// Descriptor for one instrument in the catalog.
#[derive(Debug, Clone, Copy)]
pub struct Instrument {
    pub name: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub kind: InstrumentKind,
}

/// The static instrument catalog. Every recording call must name one of
/// these; anything else is dropped with a warning.
pub fn instruments() -> &'static [Instrument] {
    use InstrumentKind::*;
    const CATALOG: &[Instrument] = &[
        Instrument {
            name: "http_requests_total",
            description: "Total HTTP requests",
            unit: "1",
            kind: Counter,
        },
        Instrument {
            name: "http_errors_total",
            description: "Total HTTP errors",
            unit: "1",
            kind: Counter,
        },
        Instrument {
            name: "bytes_processed_total",
            description: "Total bytes processed",
            unit: "bytes",
            kind: Counter,
        },
        Instrument {
            name: "active_connections",
            description: "Number of active connections",
            unit: "1",
            kind: ObservableGauge,
        },
        Instrument {
            name: "memory_usage_bytes",
            description: "Current memory usage in bytes",
            unit: "bytes",
            kind: ObservableGauge,
        },
        Instrument {
            name: "queue_size",
            description: "Current queue size",
            unit: "1",
            kind: ObservableGauge,
        },
        Instrument {
            name: "cpu_usage_percent",
            description: "Current CPU usage percentage",
            unit: "%",
            kind: ObservableGauge,
        },
        Instrument {
            name: "http_request_duration_seconds",
            description: "HTTP request duration in seconds",
            unit: "s",
            kind: Histogram,
        },
        Instrument {
            name: "db_query_duration_seconds",
            description: "Database query duration in seconds",
            unit: "s",
            kind: Histogram,
        },
        Instrument {
            name: "response_size_bytes",
            description: "HTTP response size in bytes",
            unit: "bytes",
            kind: Histogram,
        },
        Instrument {
            name: "payload_size_bytes",
            description: "Payload size",
            unit: "bytes",
            kind: Histogram,
        },
    ];
    CATALOG
}

fn lookup(name: &str) -> Option<&'static Instrument> {
    instruments().iter().find(|i| i.name == name)
}

/// One recorded series point. Counters and histograms accumulate into
/// `value` (total / sum); gauges overwrite it. `count` tracks observations.
#[derive(Debug, Default, Clone, Copy)]
struct Point {
    value: f64,
    count: u64,
}

#[derive(Default)]
struct MeterState {
    series: BTreeMap<String, BTreeMap<Attributes, Point>>,
}

/// Meter owning the OTEL-side instrument state.
#[derive(Clone)]
pub struct OtelMeter {
    resource: Arc<Attributes>,
    scope_name: Arc<String>,
    scope_version: Arc<String>,
    state: Arc<RwLock<MeterState>>,
}

impl OtelMeter {
    /// Creates a meter with resource identity from the config plus a fresh
    /// per-process instance id.
    pub fn new(service_name: &str, service_version: &str, environment: &str) -> Self {
        let mut resource = Attributes::new();
        resource.insert("service.name".to_string(), service_name.to_string());
        resource.insert("service.version".to_string(), service_version.to_string());
        resource.insert(
            "service.instance.id".to_string(),
            Uuid::new_v4().to_string(),
        );
        resource.insert(
            "deployment.environment".to_string(),
            environment.to_string(),
        );

        OtelMeter {
            resource: Arc::new(resource),
            scope_name: Arc::new(service_name.to_string()),
            scope_version: Arc::new(service_version.to_string()),
            state: Arc::new(RwLock::new(MeterState::default())),
        }
    }

    /// Adds to a counter instrument.
    pub fn add(&self, instrument: &str, attributes: &[(&str, &str)], value: f64) {
        self.record(instrument, InstrumentKind::Counter, attributes, value)
    }

    /// Records one observation into a histogram instrument.
    pub fn observe(&self, instrument: &str, attributes: &[(&str, &str)], value: f64) {
        self.record(instrument, InstrumentKind::Histogram, attributes, value)
    }

    /// Sets the current value of an observable gauge.
    pub fn set(&self, instrument: &str, attributes: &[(&str, &str)], value: f64) {
        self.record(instrument, InstrumentKind::ObservableGauge, attributes, value)
    }

    fn record(
        &self,
        instrument: &str,
        expected: InstrumentKind,
        attributes: &[(&str, &str)],
        value: f64,
    ) {
        let Some(descriptor) = lookup(instrument) else {
            warn!(instrument, "dropping sample for unknown instrument");
            return;
        };
        if descriptor.kind != expected {
            warn!(
                instrument,
                kind = descriptor.kind.as_str(),
                "dropping sample recorded with the wrong instrument kind"
            );
            return;
        }

        let attrs: Attributes = attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let mut state = self.state.write().expect("meter lock poisoned");
        let point = state
            .series
            .entry(instrument.to_string())
            .or_default()
            .entry(attrs)
            .or_default();
        match expected {
            InstrumentKind::ObservableGauge => point.value = value,
            InstrumentKind::Counter | InstrumentKind::Histogram => point.value += value,
        }
        point.count += 1;
    }

    /// Produces the serializable snapshot the JSON endpoint returns.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read().expect("meter lock poisoned");

        let metrics = instruments()
            .iter()
            .map(|descriptor| {
                let series = state.series.get(descriptor.name);
                let mut snap = InstrumentSnapshot {
                    name: descriptor.name,
                    description: descriptor.description,
                    unit: descriptor.unit,
                    kind: descriptor.kind.as_str(),
                    current_value: None,
                    current_values: None,
                    points: None,
                };
                match descriptor.kind {
                    InstrumentKind::ObservableGauge => {
                        // Gauges carry at most one attribute; flatten to the
                        // attribute value, or to a scalar when there is none.
                        let mut values = BTreeMap::new();
                        for (attrs, point) in series.into_iter().flatten() {
                            match attrs.values().next() {
                                Some(key) => {
                                    values.insert(key.clone(), point.value);
                                }
                                None => snap.current_value = Some(point.value),
                            }
                        }
                        if !values.is_empty() {
                            snap.current_values = Some(values);
                        }
                    }
                    InstrumentKind::Counter | InstrumentKind::Histogram => {
                        let points: Vec<PointSnapshot> = series
                            .into_iter()
                            .flatten()
                            .map(|(attrs, point)| PointSnapshot {
                                attributes: attrs.clone(),
                                value: point.value,
                                count: point.count,
                            })
                            .collect();
                        snap.points = Some(points);
                    }
                }
                snap
            })
            .collect();

        Snapshot {
            resource: ResourceSnapshot {
                attributes: (*self.resource).clone(),
            },
            scope_metrics: vec![ScopeSnapshot {
                scope: ScopeIdentity {
                    name: (*self.scope_name).clone(),
                    version: (*self.scope_version).clone(),
                },
                metrics,
            }],
            note: "In-process snapshot; a production setup would push these to a collector over OTLP.",
        }
    }
}

/// Resource/scope/metrics document mirroring the OTLP data layout.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub resource: ResourceSnapshot,
    pub scope_metrics: Vec<ScopeSnapshot>,
    pub note: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ResourceSnapshot {
    pub attributes: Attributes,
}

#[derive(Debug, Serialize)]
pub struct ScopeSnapshot {
    pub scope: ScopeIdentity,
    pub metrics: Vec<InstrumentSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct ScopeIdentity {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct InstrumentSnapshot {
    pub name: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_values: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<PointSnapshot>>,
}

#[derive(Debug, Serialize)]
pub struct PointSnapshot {
    pub attributes: Attributes,
    pub value: f64,
    pub count: u64,
}
