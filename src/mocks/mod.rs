//! Mock implementations for testing.
//!
//! [`MockHttpTransport`] answers from a queue of canned responses and records
//! every request it sees. Streaming bodies are drained the way a real
//! transport would, optionally slowly, so upload tests can observe the body
//! and the pipeline's backpressure.

use crate::errors::{SlackError, SlackResult, TransportError};
use crate::transport::{BodyStream, HttpRequest, HttpResponse, HttpTransport};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use http::{HeaderMap, Method, StatusCode};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Transport-level failure a mock response can stand in for
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Connection refused or reset
    ConnectionFailed(String),
    /// The request timed out
    Timeout(Duration),
}

impl From<MockFailure> for SlackError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::ConnectionFailed(message) => {
                TransportError::ConnectionFailed { message }.into()
            }
            MockFailure::Timeout(limit) => TransportError::Timeout(limit).into(),
        }
    }
}

/// Mock response configuration
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Response body
    pub body: String,
    /// HTTP status code
    pub status: u16,
    /// Delay before response
    pub delay_ms: Option<u64>,
    /// Failure to return instead of the response
    pub failure: Option<MockFailure>,
    /// Stop reading a streamed body after this many bytes
    pub read_limit: Option<usize>,
}

impl MockResponse {
    /// Create a successful JSON response
    pub fn json<T: Serialize>(data: &T) -> Self {
        Self::ok(serde_json::to_string(data).unwrap_or_default())
    }

    /// Create a successful response with raw body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    /// Create a response with an arbitrary status
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status,
            delay_ms: None,
            failure: None,
            read_limit: None,
        }
    }

    /// Create a Slack API error response
    pub fn slack_error(error_code: &str) -> Self {
        Self::ok(format!(r#"{{"ok":false,"error":"{}"}}"#, error_code))
    }

    /// Create a transport failure
    pub fn failure(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::with_status(0, "")
        }
    }

    /// Add delay to response
    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = Some(ms);
        self
    }

    /// Hang up on a streamed body after `bytes`
    pub fn with_read_limit(mut self, bytes: usize) -> Self {
        self.read_limit = Some(bytes);
        self
    }
}

/// Recorded request for verification
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request method
    pub method: Method,
    /// Request headers
    pub headers: HeaderMap,
    /// Body as sent, or as far as it was read for streamed bodies
    pub body: Bytes,
    /// Whether the body came through `send_streaming`
    pub streamed: bool,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl RecordedRequest {
    /// Value of the `Content-Type` header
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Decoded form-encoded body
    pub fn form_fields(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(&self.body)
            .into_owned()
            .collect()
    }

    /// Value of the first form field named `name`
    pub fn form_field(&self, name: &str) -> Option<String> {
        self.form_fields()
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Parts of a multipart body, `None` if it is not well formed
    pub fn multipart_parts(&self) -> Option<Vec<MultipartPart>> {
        let boundary = self.content_type()?.split("boundary=").nth(1)?;
        parse_multipart(&self.body, boundary)
    }
}

/// One decoded part of a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    /// Form field name
    pub name: String,
    /// Filename, for file parts
    pub filename: Option<String>,
    /// Part content type, if given
    pub content_type: Option<String>,
    /// Raw content
    pub data: Vec<u8>,
}

impl MultipartPart {
    /// Content as lossy UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// Mock HTTP transport for testing
pub struct MockHttpTransport {
    /// Queue of responses to return
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Recorded requests
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Default response if queue is empty
    default_response: Option<MockResponse>,
    /// Pause after each streamed chunk
    read_delay: Option<Duration>,
    /// Streamed body bytes read so far
    consumed: Arc<AtomicU64>,
}

impl MockHttpTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            default_response: None,
            read_delay: None,
            consumed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Add a response to the queue
    pub fn add_response(self, response: MockResponse) -> Self {
        self.responses.lock().push_back(response);
        self
    }

    /// Add a JSON response
    pub fn add_json_response<T: Serialize>(self, data: &T) -> Self {
        self.add_response(MockResponse::json(data))
    }

    /// Set default response when queue is empty
    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.default_response = Some(response);
        self
    }

    /// Read streamed bodies slowly, sleeping after every chunk
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Get the last recorded request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of requests received
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Counter of streamed body bytes read so far, shared with the transport
    pub fn consumed_counter(&self) -> Arc<AtomicU64> {
        self.consumed.clone()
    }

    fn record(&self, request: &HttpRequest, body: Bytes, streamed: bool) {
        self.requests.lock().push(RecordedRequest {
            url: request.url.clone(),
            method: request.method.clone(),
            headers: request.headers.clone(),
            body,
            streamed,
            timeout: request.timeout,
        });
    }

    fn next_response(&self) -> SlackResult<MockResponse> {
        let mut queue = self.responses.lock();
        queue
            .pop_front()
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| {
                TransportError::Http("No mock response configured".to_string()).into()
            })
    }

    async fn respond(&self, response: MockResponse) -> SlackResult<HttpResponse> {
        if let Some(delay) = response.delay_ms {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if let Some(failure) = response.failure {
            return Err(failure.into());
        }
        let status = StatusCode::from_u16(response.status)
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(HttpResponse::new(status, response.body))
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> SlackResult<HttpResponse> {
        let body = request.body.clone().unwrap_or_default();
        self.record(&request, body, false);
        let response = self.next_response()?;
        self.respond(response).await
    }

    async fn send_streaming(
        &self,
        request: HttpRequest,
        mut body: BodyStream,
    ) -> SlackResult<HttpResponse> {
        let response = match self.next_response() {
            Ok(response) => response,
            Err(err) => {
                self.record(&request, Bytes::new(), true);
                return Err(err);
            }
        };

        let mut received = BytesMut::new();
        let limit = response.read_limit.unwrap_or(usize::MAX);
        while received.len() < limit {
            let Some(chunk) = body.next().await else {
                break;
            };
            match chunk {
                Ok(chunk) => {
                    self.consumed.fetch_add(chunk.len() as u64, Ordering::SeqCst);
                    received.extend_from_slice(&chunk);
                }
                Err(err) => {
                    self.record(&request, received.freeze(), true);
                    return Err(TransportError::Http(err.to_string()).into());
                }
            }
            if let Some(delay) = self.read_delay {
                tokio::time::sleep(delay).await;
            }
        }
        drop(body);

        self.record(&request, received.freeze(), true);
        self.respond(response).await
    }
}

impl std::fmt::Debug for MockHttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHttpTransport")
            .field("pending_responses", &self.responses.lock().len())
            .field("recorded_requests", &self.requests.lock().len())
            .finish()
    }
}

/// Split a `multipart/form-data` body into its parts
///
/// Returns `None` unless the body starts with the first delimiter, every part
/// has a header block with a `name`, and the body ends with the closing
/// delimiter.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Option<Vec<MultipartPart>> {
    let opening = format!("--{}", boundary);
    let separator = format!("\r\n--{}", boundary);

    let mut rest = body.strip_prefix(opening.as_bytes())?;
    let mut parts = Vec::new();
    loop {
        if let Some(tail) = rest.strip_prefix(b"--") {
            return (tail == b"\r\n").then_some(parts);
        }
        rest = rest.strip_prefix(b"\r\n")?;
        let end = find(rest, separator.as_bytes())?;
        parts.push(parse_part(&rest[..end])?);
        rest = &rest[end + separator.len()..];
    }
}

fn parse_part(raw: &[u8]) -> Option<MultipartPart> {
    let header_end = find(raw, b"\r\n\r\n")?;
    let headers = std::str::from_utf8(&raw[..header_end]).ok()?;

    let mut name = None;
    let mut filename = None;
    let mut content_type = None;
    for line in headers.split("\r\n") {
        let (key, value) = line.split_once(": ")?;
        if key.eq_ignore_ascii_case("content-disposition") {
            name = quoted_param(value, "name");
            filename = quoted_param(value, "filename");
        } else if key.eq_ignore_ascii_case("content-type") {
            content_type = Some(value.to_string());
        }
    }

    Some(MultipartPart {
        name: name?,
        filename,
        content_type,
        data: raw[header_end + 4..].to_vec(),
    })
}

fn quoted_param(header: &str, key: &str) -> Option<String> {
    let marker = format!("; {}=\"", key);
    let start = header.find(&marker)? + marker.len();
    let len = header[start..].find('"')?;
    Some(header[start..start + len].to_string())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_mock_transport_records_form_requests() {
        let transport =
            MockHttpTransport::new().with_default_response(MockResponse::ok(r#"{"ok":true}"#));
        let fields = vec![("channel".to_string(), "C1".to_string())];
        let request = HttpRequest::form("https://slack.com/api/test", HeaderMap::new(), &fields);

        let response = transport.send(request).await.unwrap();
        assert!(response.is_success());

        let recorded = transport.last_request().unwrap();
        assert_eq!(recorded.url, "https://slack.com/api/test");
        assert_eq!(recorded.form_field("channel").as_deref(), Some("C1"));
        assert!(!recorded.streamed);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_transport_failure_and_empty_queue() {
        let transport = MockHttpTransport::new().add_response(MockResponse::failure(
            MockFailure::ConnectionFailed("refused".to_string()),
        ));
        let request = HttpRequest::post("https://slack.com/api/test", HeaderMap::new());

        let err = transport.send(request.clone()).await.unwrap_err();
        assert!(matches!(err, SlackError::Transport(TransportError::ConnectionFailed { .. })));

        let err = transport.send(request).await.unwrap_err();
        assert_eq!(err.error_code(), "SLACK_TRANSPORT");
    }

    #[tokio::test]
    async fn test_mock_transport_drains_streams() {
        let transport = MockHttpTransport::new().add_response(MockResponse::ok("{}"));
        let chunks: Vec<std::io::Result<Bytes>> =
            vec![Ok(Bytes::from_static(b"ab")), Ok(Bytes::from_static(b"cd"))];
        let body: BodyStream = Box::new(futures::stream::iter(chunks));
        let request = HttpRequest::post("https://slack.com/api/test", HeaderMap::new());

        transport.send_streaming(request, body).await.unwrap();

        let recorded = transport.last_request().unwrap();
        assert_eq!(&recorded.body[..], b"abcd");
        assert!(recorded.streamed);
        assert_eq!(transport.consumed_counter().load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_parse_multipart() {
        let body = b"--B\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
            Content-Type: text/plain\r\n\
            \r\n\
            hi\r\n\
            --B\r\n\
            Content-Disposition: form-data; name=\"title\"\r\n\
            \r\n\
            A\r\n\
            --B--\r\n";

        let parts = parse_multipart(body, "B").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "file");
        assert_eq!(parts[0].filename.as_deref(), Some("a.txt"));
        assert_eq!(parts[0].content_type.as_deref(), Some("text/plain"));
        assert_eq!(parts[0].text(), "hi");
        assert_eq!(parts[1].name, "title");
        assert_eq!(parts[1].filename, None);
        assert_eq!(parts[1].text(), "A");
    }

    #[test]
    fn test_parse_multipart_rejects_truncated_body() {
        let body = b"--B\r\nContent-Disposition: form-data; name=\"file\"\r\n\r\nhal";
        assert!(parse_multipart(body, "B").is_none());
    }
}
