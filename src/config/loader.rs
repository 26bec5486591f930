//! Configuration loading from the process environment.

use crate::config::schema::SimulatorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the `slo-domain` label.
pub const SLO_DOMAIN_ENV: &str = "SLO_DOMAIN";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build and validate the configuration from defaults and the environment.
pub fn from_env() -> Result<SimulatorConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Build and validate the configuration using `lookup` to read variables.
///
/// An empty `SLO_DOMAIN` counts as unset.
pub fn load_with<F>(lookup: F) -> Result<SimulatorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = SimulatorConfig::default();

    if let Some(domain) = lookup(SLO_DOMAIN_ENV).filter(|d| !d.is_empty()) {
        config.slo.domain = domain;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
