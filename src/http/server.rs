//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wrap the whole router (fallback included) in the timing middleware
//! - Serve until the shutdown signal fires

use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::StatusCode,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::SimulatorConfig;
use crate::error::StartupError;
use crate::health::health_handler;
use crate::http::middleware::timing_middleware;
use crate::observability::metrics::{metrics_handler, RequestMetrics};
use crate::simulation::{index_handler, RandomSource, SimulationState};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub simulation: SimulationState,
    pub metrics: RequestMetrics,
}

impl FromRef<AppState> for SimulationState {
    fn from_ref(state: &AppState) -> Self {
        state.simulation.clone()
    }
}

impl FromRef<AppState> for RequestMetrics {
    fn from_ref(state: &AppState) -> Self {
        state.metrics.clone()
    }
}

/// HTTP server for the simulator.
pub struct SimulatorServer {
    router: Router,
    config: SimulatorConfig,
}

impl SimulatorServer {
    /// Create a new server recording into `metrics` and drawing from `random`.
    pub fn new(
        config: SimulatorConfig,
        metrics: RequestMetrics,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, StartupError> {
        let state = AppState {
            simulation: SimulationState::from_config(&config, random)?,
            metrics,
        };

        let router = build_router(state);
        Ok(Self { router, config })
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), StartupError> {
        let addr = listener.local_addr().map_err(StartupError::Bind)?;
        tracing::info!(
            address = %addr,
            slo_app = %self.config.slo.app,
            slo_domain = %self.config.slo.domain,
            "Server started"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await
            .map_err(StartupError::Serve)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/liveness", get(health_handler))
        .route("/readiness", get(health_handler))
        .route("/", get(index_handler))
        .route("/metrics", get(metrics_handler))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            timing_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 page not found\n")
}
