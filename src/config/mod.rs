//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! SimulatorConfig::default()
//!     → loader.rs (apply environment overrides)
//!     → validation.rs (semantic checks)
//!     → SimulatorConfig (validated, immutable)
//!     → cloned into the server and handler state
//! ```
//!
//! # Design Decisions
//! - Every field has a default; the service runs with no configuration at all
//! - The only external knob is `SLO_DOMAIN`; the listener is fixed at :8080
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::LatencyConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::SimulatorConfig;
pub use schema::SloConfig;
