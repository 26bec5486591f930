//! Router-wide middleware.

pub mod timing;

pub use timing::timing_middleware;
