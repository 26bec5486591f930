//! Configuration schema definitions.
//!
//! All types derive Serde traits so the effective configuration can be
//! logged at startup and built from partial documents in tests.

use serde::{Deserialize, Serialize};

/// Label reported in `slo-app` and in the `app` metric label.
pub const DEFAULT_SLO_APP: &str = "go-simple-server";

/// Domain reported in `slo-domain` when `SLO_DOMAIN` is unset or empty.
pub const DEFAULT_SLO_DOMAIN: &str = "go-simple-server-domain";

/// Root configuration for the simulator.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// SLO labels attached to simulated responses.
    pub slo: SloConfig,

    /// Simulated latency for the index endpoint.
    pub latency: LatencyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address. The binary always uses the default.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SloConfig {
    /// Application label (`slo-app` header, `app` metric label).
    pub app: String,

    /// Domain label (`slo-domain` header).
    pub domain: String,
}

impl Default for SloConfig {
    fn default() -> Self {
        Self {
            app: DEFAULT_SLO_APP.to_string(),
            domain: DEFAULT_SLO_DOMAIN.to_string(),
        }
    }
}

/// Upper bound (exclusive) of the random delay applied by the index handler.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LatencyConfig {
    /// Delay is drawn uniformly from `[0, max_ms)`. Zero disables the delay.
    pub max_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self { max_ms: 1000 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Seconds between metrics exporter upkeep runs.
    pub upkeep_secs: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            upkeep_secs: 5,
        }
    }
}
