//! SLO Simulator Library
//!
//! A synthetic HTTP target for exercising SLO monitoring pipelines: health
//! probes, a root endpoint that randomly succeeds or fails after a random
//! delay, and a Prometheus endpoint exposing request-duration histograms.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod simulation;

pub use config::SimulatorConfig;
pub use error::StartupError;
pub use http::SimulatorServer;
pub use lifecycle::Shutdown;
pub use observability::metrics::RequestMetrics;
pub use simulation::{RandomSource, ScriptedRandom, SeededRandom};
