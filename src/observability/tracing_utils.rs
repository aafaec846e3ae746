//! Request tracing hooks.
//!
//! When `SlackConfig::trace_requests` is set, every call logs a start event,
//! a redacted dump of the outgoing request, a dump of the response and an
//! end event with the elapsed time. With tracing disabled the hooks are
//! no-ops.

use super::logging::{redact_fields, redact_headers, redact_url};
use crate::errors::SlackResult;
use crate::transport::{HttpRequest, HttpResponse};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Request-scoped trace info
#[derive(Debug, Clone)]
pub struct RequestTrace {
    enabled: bool,
    /// Start time
    pub start_time: Instant,
    /// Request ID
    pub request_id: String,
    /// API method name
    pub method: String,
}

impl RequestTrace {
    /// Begin tracing a call to `method`
    pub fn start(enabled: bool, method: impl Into<String>) -> Self {
        let trace = Self {
            enabled,
            start_time: Instant::now(),
            request_id: uuid::Uuid::new_v4().to_string(),
            method: method.into(),
        };
        if trace.enabled {
            debug!(request_id = %trace.request_id, method = %trace.method, "Start request");
        }
        trace
    }

    /// Whether the hooks emit anything
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Dump the outgoing request and its form fields
    pub fn dump_request(&self, request: &HttpRequest, fields: &[(String, String)]) {
        if !self.enabled {
            return;
        }
        trace!(
            request_id = %self.request_id,
            http_method = %request.method,
            url = %redact_url(&request.url),
            content_type = request.content_type().unwrap_or(""),
            headers = %redact_headers(&request.headers),
            fields = %redact_fields(fields),
            "Request dump"
        );
    }

    /// Dump the received response
    pub fn dump_response(&self, response: &HttpResponse) {
        if !self.enabled {
            return;
        }
        trace!(
            request_id = %self.request_id,
            status = %response.status,
            body = %response.body_text(),
            "Response dump"
        );
    }

    /// Log the end of the exchange
    pub fn finish(&self, result: &SlackResult<HttpResponse>) {
        if !self.enabled {
            return;
        }
        let elapsed_ms = self.elapsed().as_millis() as u64;
        match result {
            Ok(response) => {
                self.dump_response(response);
                debug!(request_id = %self.request_id, method = %self.method, elapsed_ms, "End request");
            }
            Err(err) => {
                warn!(request_id = %self.request_id, method = %self.method, elapsed_ms, error = %err, "Request failed");
            }
        }
    }
}
