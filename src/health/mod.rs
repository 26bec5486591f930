//! Liveness and readiness probes.
//!
//! The simulator has no dependencies to wait on, so both probes answer
//! 200 "OK" unconditionally for as long as the process serves traffic.

use axum::http::StatusCode;

/// `GET /liveness` and `GET /readiness`
pub async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
