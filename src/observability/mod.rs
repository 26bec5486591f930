//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Timing middleware produces one RequestObservation per request:
//!     → metrics.rs (request_duration_seconds histogram)
//!     → logging.rs (access log line on stdout)
//!
//! Consumers:
//!     → GET /metrics (Prometheus scrape)
//!     → Log aggregation (stdout)
//! ```

pub mod logging;
pub mod metrics;
