//! Startup orchestration.
//!
//! Subsystems initialize in order; the listener binds last so traffic only
//! arrives once metrics and the random source exist.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::{self, ConfigError, ObservabilityConfig, SimulatorConfig};
use crate::error::StartupError;
use crate::http::SimulatorServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::{logging, metrics::RequestMetrics};
use crate::simulation::{RandomSource, SeededRandom};

/// Load configuration, install logging, then serve until terminated.
///
/// Logging is installed even when the configuration is rejected, so the
/// fatal error reaches stdout like every other event.
pub async fn run() -> Result<(), StartupError> {
    let loaded = config::loader::from_env();
    logging::init(&logging_config(&loaded));
    let config = loaded?;

    tracing::info!(
        config = %serde_json::to_string(&config).unwrap_or_default(),
        "Configuration loaded"
    );

    serve(config).await
}

/// Logging settings for a load attempt; defaults when loading failed.
fn logging_config(loaded: &Result<SimulatorConfig, ConfigError>) -> ObservabilityConfig {
    match loaded {
        Ok(config) => config.observability.clone(),
        Err(_) => ObservabilityConfig::default(),
    }
}

/// Build every subsystem from `config` and serve on its bind address.
pub async fn serve(config: SimulatorConfig) -> Result<(), StartupError> {
    let metrics = RequestMetrics::new(&config.slo.app)?;
    let random: Arc<dyn RandomSource> = Arc::new(SeededRandom::from_entropy());
    let server = SimulatorServer::new(config, metrics.clone(), random)?;

    let listener = TcpListener::bind(&server.config().listener.bind_address)
        .await
        .map_err(StartupError::Bind)?;

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    metrics.spawn_upkeep(
        Duration::from_secs(server.config().observability.upkeep_secs),
        shutdown.subscribe(),
    );
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    server.run(listener, stop).await
}
