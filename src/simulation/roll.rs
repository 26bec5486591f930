//! A single simulated request outcome.

use std::time::Duration;

use axum::http::StatusCode;

use crate::simulation::dice::RandomSource;

/// Number of faces on the outcome die.
pub const OUTCOME_FACES: u64 = 10;

/// SLO class attached to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SloClass {
    High,
    Low,
}

impl SloClass {
    pub const ALL: [SloClass; 2] = [SloClass::High, SloClass::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            SloClass::High => "high",
            SloClass::Low => "low",
        }
    }
}

/// Whether a response counts against the error budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SloResult {
    Ok,
    Fail,
}

impl SloResult {
    pub fn as_str(self) -> &'static str {
        match self {
            SloResult::Ok => "ok",
            SloResult::Fail => "fail",
        }
    }
}

/// Simulated response outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    NotFound,
    InternalError,
}

impl Outcome {
    /// Map a draw in `[0, 10)` to an outcome: `[0,5)` success,
    /// `[5,7)` not found, everything else internal error.
    pub fn from_draw(draw: u64) -> Self {
        match draw {
            0..=4 => Outcome::Success,
            5..=6 => Outcome::NotFound,
            _ => Outcome::InternalError,
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            Outcome::Success => StatusCode::OK,
            Outcome::NotFound => StatusCode::NOT_FOUND,
            Outcome::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            Outcome::Success => "OK",
            Outcome::NotFound => "Not found",
            Outcome::InternalError => "Internal server error",
        }
    }

    /// 404s are expected failures and do not count against the SLO.
    pub fn slo_result(self) -> SloResult {
        match self {
            Outcome::Success | Outcome::NotFound => SloResult::Ok,
            Outcome::InternalError => SloResult::Fail,
        }
    }
}

/// Latency, class and outcome for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SloRoll {
    pub latency: Duration,
    pub class: SloClass,
    pub outcome: Outcome,
}

impl SloRoll {
    /// Draw latency in `[0, max_latency_ms)`, then class, then outcome.
    pub fn roll(rng: &dyn RandomSource, max_latency_ms: u64) -> Self {
        let latency = Duration::from_millis(rng.below(max_latency_ms));
        let class = match rng.below(SloClass::ALL.len() as u64) {
            0 => SloClass::High,
            _ => SloClass::Low,
        };
        let outcome = Outcome::from_draw(rng.below(OUTCOME_FACES));

        Self {
            latency,
            class,
            outcome,
        }
    }
}
