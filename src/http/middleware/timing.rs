//! Request timing: one histogram sample and one access log line per request.

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;

use crate::http::observer::ResponseObserver;
use crate::observability::logging::ACCESS_LOG_TARGET;
use crate::observability::metrics::RequestMetrics;

/// Middleware function timing every request through the router.
///
/// The downstream call runs on its own task, so a client that disconnects
/// mid-request does not cancel it: the request is still observed and
/// logged once the handler finishes.
pub async fn timing_middleware(
    State(metrics): State<RequestMetrics>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let task = tokio::spawn(
        async move {
            let mut observer = ResponseObserver::new();

            let start = Instant::now();
            let response = next.run(request).await;
            let elapsed = start.elapsed();

            observer.observe(&response);
            let observation = observer.into_observation(method, uri, elapsed);

            metrics.observe(&observation);
            tracing::info!(target: ACCESS_LOG_TARGET, "{}", observation);

            response
        }
        .in_current_span(),
    );

    match task.await {
        Ok(response) => response,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            tracing::warn!(error = %e, "Request task cancelled");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts access log events.
    struct AccessLogCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for AccessLogCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if event.metadata().target() == ACCESS_LOG_TARGET {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn app(metrics: RequestMetrics) -> Router {
        Router::new()
            .route("/teapot", get(|| async { (StatusCode::IM_A_TEAPOT, "short and stout") }))
            .route("/plain", get(|| async { "no explicit status" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                    "finally"
                }),
            )
            .layer(middleware::from_fn_with_state(metrics, timing_middleware))
    }

    async fn send(app: Router, uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_one_log_line_and_sample_per_request() {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(AccessLogCounter(count.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let metrics = RequestMetrics::new("timing-test").unwrap();
        let app = app(metrics.clone());

        assert_eq!(send(app.clone(), "/teapot").await, StatusCode::IM_A_TEAPOT);
        assert_eq!(send(app.clone(), "/plain").await, StatusCode::OK);
        assert_eq!(send(app, "/missing").await, StatusCode::NOT_FOUND);

        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(metrics.sample_count("GET", "/teapot", 418), 1);
        assert_eq!(metrics.sample_count("GET", "/plain", 200), 1);
        assert_eq!(metrics.sample_count("GET", "/missing", 404), 1);
    }

    #[tokio::test]
    async fn test_endpoint_label_is_raw_uri() {
        let metrics = RequestMetrics::new("timing-test").unwrap();
        send(app(metrics.clone()), "/plain?check=1").await;
        assert_eq!(metrics.sample_count("GET", "/plain?check=1", 200), 1);
        assert_eq!(metrics.sample_count("GET", "/plain", 200), 0);
    }

    #[tokio::test]
    async fn test_dropped_request_still_recorded() {
        let metrics = RequestMetrics::new("timing-test").unwrap();
        let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();

        let pending = app(metrics.clone()).oneshot(request);
        let gave_up = tokio::time::timeout(std::time::Duration::from_millis(10), pending).await;
        assert!(gave_up.is_err());

        tokio::time::sleep(std::time::Duration::from_millis(150)).await;
        assert_eq!(metrics.sample_count("GET", "/slow", 200), 1);
    }
}
