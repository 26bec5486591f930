//! SLO outcome simulation.
//!
//! # Data Flow
//! ```text
//! GET /
//!     → handler.rs (labels, sleep, response)
//!     → roll.rs (latency, class and outcome drawn from a RandomSource)
//!     → dice.rs (seeded or scripted random source)
//! ```
//!
//! # Outcome Table
//! ```text
//! draw in [0, 10)   status   body                     slo-result
//! [0, 5)            200      OK                       ok
//! [5, 7)            404      Not found                ok
//! [7, 10)           500      Internal server error    fail
//! ```
//!
//! 404s are reported as `ok` so they do not burn error budget.

pub mod dice;
pub mod handler;
pub mod roll;

use axum::http::HeaderName;

pub use dice::{RandomSource, ScriptedRandom, SeededRandom};
pub use handler::{index_handler, SimulationState, SloLabels};
pub use roll::{Outcome, SloClass, SloResult, SloRoll};

pub const SLO_APP: HeaderName = HeaderName::from_static("slo-app");
pub const SLO_DOMAIN: HeaderName = HeaderName::from_static("slo-domain");
pub const SLO_CLASS: HeaderName = HeaderName::from_static("slo-class");
pub const SLO_RESULT: HeaderName = HeaderName::from_static("slo-result");
