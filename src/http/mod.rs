//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routing)
//!     → middleware/timing.rs (start clock)
//!     → handler (health, index, metrics, fallback)
//!     → observer.rs (status + SLO labels actually sent)
//!     → middleware/timing.rs (histogram sample, access log)
//!     → Send to client
//! ```

pub mod middleware;
pub mod observer;
pub mod server;

pub use observer::{RequestObservation, ResponseObserver};
pub use server::{build_router, AppState, SimulatorServer};
