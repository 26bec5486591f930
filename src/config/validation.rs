//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - SLO labels must be usable as HTTP header values
//! - Bind address and log level must parse
//! - Metrics upkeep interval must be non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SimulatorConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use axum::http::HeaderValue;
use tracing::level_filters::LevelFilter;

use crate::config::schema::SimulatorConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is not a valid header value: {value:?}")]
    InvalidHeaderValue { field: &'static str, value: String },

    #[error("listener.bind_address is not a socket address: {0:?}")]
    InvalidBindAddress(String),

    #[error("observability.log_level is not a log level: {0:?}")]
    InvalidLogLevel(String),

    #[error("observability.upkeep_secs must be greater than zero")]
    ZeroUpkeepInterval,
}

/// Validate the configuration, collecting every error found.
pub fn validate_config(config: &SimulatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_label("slo.app", &config.slo.app, &mut errors);
    check_label("slo.domain", &config.slo.domain, &mut errors);

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.upkeep_secs == 0 {
        errors.push(ValidationError::ZeroUpkeepInterval);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_label(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.is_empty() {
        errors.push(ValidationError::Empty { field });
    } else if HeaderValue::from_str(value).is_err() {
        errors.push(ValidationError::InvalidHeaderValue {
            field,
            value: value.to_string(),
        });
    }
}
