//! Metrics collection and exposition.
//!
//! # Metrics
//! - `request_duration_seconds` (histogram): latency distribution, labeled
//!   by `app`, `method`, `endpoint` and `status_code`
//!
//! # Design Decisions
//! - The Prometheus recorder is owned by `RequestMetrics` and never installed
//!   globally; every sample is recorded through `with_local_recorder`
//! - Buckets are the Prometheus client defaults
//! - Histogram updates are atomic inside the exporter, so concurrent
//!   requests record without extra locking
//! - Upkeep runs on a timer so buffered samples are drained even when
//!   nothing scrapes the endpoint

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::header, response::IntoResponse};
use metrics::{describe_histogram, histogram, Unit};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::http::observer::RequestObservation;

pub const REQUEST_DURATION: &str = "request_duration_seconds";

/// Prometheus client default latency buckets, in seconds.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Process-lifetime request duration accumulator.
#[derive(Clone)]
pub struct RequestMetrics {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
    app: Arc<str>,
}

impl RequestMetrics {
    /// Build a recorder whose samples carry `app` as the application label.
    pub fn new(app: &str) -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), &DEFAULT_BUCKETS)?
            .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_histogram!(
                REQUEST_DURATION,
                Unit::Seconds,
                "Time (in seconds) spent serving HTTP requests."
            );
        });

        Ok(Self {
            recorder: Arc::new(recorder),
            handle,
            app: Arc::from(app),
        })
    }

    /// Record one served request.
    pub fn observe(&self, observation: &RequestObservation) {
        metrics::with_local_recorder(self.recorder.as_ref(), || {
            histogram!(
                REQUEST_DURATION,
                "app" => self.app.to_string(),
                "method" => observation.method.to_string(),
                "endpoint" => observation.uri.to_string(),
                "status_code" => observation.status.as_u16().to_string()
            )
            .record(observation.elapsed.as_secs_f64());
        });
    }

    /// Run exporter upkeep every `period` until `shutdown` fires.
    pub fn spawn_upkeep(
        &self,
        period: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let handle = self.handle.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => handle.run_upkeep(),
                    _ = shutdown.recv() => {
                        tracing::debug!("Metrics upkeep stopped");
                        break;
                    }
                }
            }
        })
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Number of samples recorded for one series, 0 if it does not exist.
    pub fn sample_count(&self, method: &str, endpoint: &str, status_code: u16) -> u64 {
        let wanted = [
            format!("app=\"{}\"", self.app),
            format!("method=\"{method}\""),
            format!("endpoint=\"{endpoint}\""),
            format!("status_code=\"{status_code}\""),
        ];
        let prefix = format!("{REQUEST_DURATION}_count{{");

        self.render()
            .lines()
            .filter(|line| line.starts_with(&prefix))
            .filter(|line| wanted.iter().all(|label| line.contains(label.as_str())))
            .filter_map(|line| line.rsplit(' ').next()?.parse::<u64>().ok())
            .sum()
    }
}

/// `GET /metrics`
pub async fn metrics_handler(State(metrics): State<RequestMetrics>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;
    use axum::http::{Method, StatusCode, Uri};

    fn observation(uri: &'static str, status: StatusCode, ms: u64) -> RequestObservation {
        RequestObservation {
            method: Method::GET,
            uri: Uri::from_static(uri),
            status,
            elapsed: Duration::from_millis(ms),
            slo_class: None,
            slo_result: None,
        }
    }

    #[test]
    fn test_renders_histogram_with_default_buckets() {
        let metrics = RequestMetrics::new("go-simple-server").unwrap();
        metrics.observe(&observation("/", StatusCode::OK, 30));

        let text = metrics.render();
        assert!(text.contains("# TYPE request_duration_seconds histogram"));
        assert!(text.contains("Time (in seconds) spent serving HTTP requests."));
        assert!(text.contains("le=\"0.005\""));
        assert!(text.contains("le=\"+Inf\""));
        assert_eq!(metrics.sample_count("GET", "/", 200), 1);
    }

    #[test]
    fn test_series_keyed_by_status() {
        let metrics = RequestMetrics::new("go-simple-server").unwrap();
        metrics.observe(&observation("/", StatusCode::OK, 1));
        metrics.observe(&observation("/", StatusCode::OK, 2));
        metrics.observe(&observation("/", StatusCode::INTERNAL_SERVER_ERROR, 3));

        assert_eq!(metrics.sample_count("GET", "/", 200), 2);
        assert_eq!(metrics.sample_count("GET", "/", 500), 1);
        assert_eq!(metrics.sample_count("GET", "/", 404), 0);
    }

    #[test]
    fn test_recorders_are_independent() {
        let a = RequestMetrics::new("a").unwrap();
        let b = RequestMetrics::new("b").unwrap();
        a.observe(&observation("/liveness", StatusCode::OK, 1));

        assert_eq!(a.sample_count("GET", "/liveness", 200), 1);
        assert!(!b.render().contains("/liveness"));
    }

    #[test]
    fn test_concurrent_observations_are_not_lost() {
        let metrics = RequestMetrics::new("go-simple-server").unwrap();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let metrics = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        metrics.observe(&observation("/", StatusCode::OK, 5));
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(metrics.sample_count("GET", "/", 200), 2_000);
    }

    #[tokio::test]
    async fn test_upkeep_keeps_samples_and_stops_on_shutdown() {
        let metrics = RequestMetrics::new("go-simple-server").unwrap();
        let shutdown = Shutdown::new();
        let upkeep = metrics.spawn_upkeep(Duration::from_millis(10), shutdown.subscribe());

        metrics.observe(&observation("/", StatusCode::OK, 1));
        tokio::time::sleep(Duration::from_millis(50)).await;
        metrics.observe(&observation("/", StatusCode::OK, 2));
        assert_eq!(metrics.sample_count("GET", "/", 200), 2);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), upkeep)
            .await
            .unwrap()
            .unwrap();
    }
}
