//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber (stdout, full timestamps)
//! - Resolve the filter from `RUST_LOG`, else the configured level
//!
//! One access log event is emitted per request under `ACCESS_LOG_TARGET`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Target of the per-request access log line.
pub const ACCESS_LOG_TARGET: &str = "slo_simulator::access";

/// Filter applied when `RUST_LOG` is unset.
pub fn default_filter(config: &ObservabilityConfig) -> String {
    format!(
        "slo_simulator={level},tower_http={level}",
        level = config.log_level
    )
}

/// Install the global subscriber. Call once, before serving.
pub fn init(config: &ObservabilityConfig) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();
}
