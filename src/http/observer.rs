//! Response observation.
//!
//! The observer sits between the downstream service and the timing
//! middleware and records what was actually sent: the status code (200 if
//! none was recorded) and the SLO labels the handler attached.

use std::fmt;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::Response;

use crate::simulation::{SLO_CLASS, SLO_RESULT};

/// Records the status and SLO labels of an outgoing response.
#[derive(Debug, Default)]
pub struct ResponseObserver {
    status: Option<StatusCode>,
    slo_class: Option<String>,
    slo_result: Option<String>,
}

impl ResponseObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an explicitly written status code.
    pub fn write_header(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Record everything needed from a finished response.
    pub fn observe(&mut self, response: &Response) {
        self.write_header(response.status());
        self.slo_class = header_text(response.headers(), &SLO_CLASS);
        self.slo_result = header_text(response.headers(), &SLO_RESULT);
    }

    /// Status observed so far.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn into_observation(self, method: Method, uri: Uri, elapsed: Duration) -> RequestObservation {
        RequestObservation {
            status: self.status(),
            method,
            uri,
            elapsed,
            slo_class: self.slo_class,
            slo_result: self.slo_result,
        }
    }
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Everything recorded about one served request.
#[derive(Debug, Clone)]
pub struct RequestObservation {
    pub method: Method,
    pub uri: Uri,
    pub status: StatusCode,
    pub elapsed: Duration,
    pub slo_class: Option<String>,
    pub slo_result: Option<String>,
}

/// Access log line: `GET / 200 412.3ms slo-class=high slo-result=ok`.
impl fmt::Display for RequestObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {:?} slo-class={} slo-result={}",
            self.method,
            self.uri,
            self.status.as_u16(),
            self.elapsed,
            self.slo_class.as_deref().unwrap_or_default(),
            self.slo_result.as_deref().unwrap_or_default(),
        )
    }
}
