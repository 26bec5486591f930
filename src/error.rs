//! Startup errors.
//!
//! Request handling has no failure path of its own: 500 responses are
//! simulated outcomes, not errors. Everything here is fatal to the process.

use axum::http::header::InvalidHeaderValue;
use metrics_exporter_prometheus::BuildError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid SLO label: {0}")]
    Label(#[from] InvalidHeaderValue),

    #[error("Failed to build metrics recorder: {0}")]
    Metrics(#[from] BuildError),

    #[error("Failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
