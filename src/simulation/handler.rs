//! Index handler: random latency, class and outcome per request.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::config::SimulatorConfig;
use crate::simulation::dice::RandomSource;
use crate::simulation::roll::SloRoll;
use crate::simulation::{SLO_APP, SLO_CLASS, SLO_DOMAIN, SLO_RESULT};

/// Pre-encoded `slo-app` and `slo-domain` header values.
#[derive(Debug, Clone)]
pub struct SloLabels {
    pub app: HeaderValue,
    pub domain: HeaderValue,
}

impl SloLabels {
    pub fn new(app: &str, domain: &str) -> Result<Self, axum::http::header::InvalidHeaderValue> {
        Ok(Self {
            app: HeaderValue::from_str(app)?,
            domain: HeaderValue::from_str(domain)?,
        })
    }
}

/// State owned by the index handler.
#[derive(Clone)]
pub struct SimulationState {
    pub random: Arc<dyn RandomSource>,
    pub labels: SloLabels,
    pub max_latency_ms: u64,
}

impl SimulationState {
    pub fn from_config(
        config: &SimulatorConfig,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self, axum::http::header::InvalidHeaderValue> {
        Ok(Self {
            random,
            labels: SloLabels::new(&config.slo.app, &config.slo.domain)?,
            max_latency_ms: config.latency.max_ms,
        })
    }
}

/// `GET /`
///
/// Sleeps for the drawn latency without blocking other requests, then
/// answers 200, 404 or 500 with the SLO headers set.
pub async fn index_handler(State(state): State<SimulationState>) -> Response {
    let roll = SloRoll::roll(state.random.as_ref(), state.max_latency_ms);

    let mut headers = HeaderMap::new();
    headers.insert(SLO_APP, state.labels.app.clone());
    headers.insert(SLO_DOMAIN, state.labels.domain.clone());

    tokio::time::sleep(roll.latency).await;

    headers.insert(SLO_CLASS, HeaderValue::from_static(roll.class.as_str()));
    headers.insert(
        SLO_RESULT,
        HeaderValue::from_static(roll.outcome.slo_result().as_str()),
    );

    tracing::debug!(
        latency = ?roll.latency,
        class = roll.class.as_str(),
        outcome = ?roll.outcome,
        "Simulated request"
    );

    (roll.outcome.status(), headers, roll.outcome.body()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::dice::ScriptedRandom;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    fn state(draws: Vec<u64>) -> SimulationState {
        SimulationState {
            random: Arc::new(ScriptedRandom::new(draws)),
            labels: SloLabels::new("app-under-test", "domain-under-test").unwrap(),
            max_latency_ms: 1000,
        }
    }

    async fn call(draws: Vec<u64>) -> (StatusCode, HeaderMap, String) {
        let response = index_handler(State(state(draws))).await;
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_success_branch() {
        let (status, headers, body) = call(vec![0, 0, 4]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
        assert_eq!(headers[SLO_CLASS], "high");
        assert_eq!(headers[SLO_RESULT], "ok");
        assert_eq!(headers[SLO_APP], "app-under-test");
        assert_eq!(headers[SLO_DOMAIN], "domain-under-test");
    }

    #[tokio::test]
    async fn test_not_found_is_not_an_slo_failure() {
        let (status, headers, body) = call(vec![0, 1, 5]).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not found");
        assert_eq!(headers[SLO_CLASS], "low");
        assert_eq!(headers[SLO_RESULT], "ok");
    }

    #[tokio::test]
    async fn test_internal_error_fails_slo() {
        let (status, headers, body) = call(vec![0, 0, 7]).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
        assert_eq!(headers[SLO_RESULT], "fail");
    }

    #[tokio::test]
    async fn test_sleeps_for_drawn_latency() {
        let start = std::time::Instant::now();
        let (status, _, _) = call(vec![120, 0, 0]).await;
        assert_eq!(status, StatusCode::OK);
        assert!(start.elapsed() >= std::time::Duration::from_millis(120));
    }
}
