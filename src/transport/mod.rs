//! HTTP transport layer for the Slack client.
//!
//! Provides low-level HTTP communication with the Slack API. The transport
//! knows nothing about envelopes or typed responses; it moves bytes and
//! reports network failures. Decoding lives in [`crate::client`].

use crate::errors::{SlackResult, TransportError};
use crate::observability::redact_url;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, StatusCode};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Streaming request body
pub type BodyStream = Box<dyn Stream<Item = std::io::Result<Bytes>> + Send + Sync + Unpin>;

/// Form content type used for non-upload calls
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP transport trait for making API requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request with a buffered body
    async fn send(&self, request: HttpRequest) -> SlackResult<HttpResponse>;

    /// Send a request whose body is read from `body` while transmitting
    async fn send_streaming(
        &self,
        request: HttpRequest,
        body: BodyStream,
    ) -> SlackResult<HttpResponse>;
}

/// Outgoing HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Full URL
    pub url: String,
    /// Request headers
    pub headers: HeaderMap,
    /// Buffered body, ignored by `send_streaming`
    pub body: Option<Bytes>,
    /// Request timeout
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a POST request without a body
    pub fn post(url: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers,
            body: None,
            timeout: None,
        }
    }

    /// Create a form-encoded POST request
    pub fn form(url: impl Into<String>, mut headers: HeaderMap, fields: &[(String, String)]) -> Self {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        Self {
            body: Some(Bytes::from(body)),
            ..Self::post(url, headers)
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Value of the `Content-Type` header, if set
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

/// HTTP response received
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response from parts
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Check if the response indicates success (2xx status)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as lossy UTF-8, for logging
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Default HTTP transport implementation using reqwest
pub struct ReqwestTransport {
    client: Client,
    connect_timeout: Duration,
}

impl ReqwestTransport {
    /// Create a new transport
    ///
    /// No client-wide timeout is set; each request carries its own, so long
    /// uploads are not cut off by the limit meant for ordinary calls.
    pub fn new(connect_timeout: Duration) -> SlackResult<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;

        Ok(Self {
            client,
            connect_timeout,
        })
    }

    /// Create a new transport with a pre-built client
    pub fn with_client(client: Client, connect_timeout: Duration) -> Self {
        Self {
            client,
            connect_timeout,
        }
    }

    fn builder_for(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }

    async fn execute(
        &self,
        builder: reqwest::RequestBuilder,
        timeout: Option<Duration>,
    ) -> SlackResult<HttpResponse> {
        let limit = timeout.unwrap_or(self.connect_timeout);
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, limit))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(e, limit))?;

        if !status.is_success() {
            warn!(status = %status, "Request failed with non-success status");
        }
        debug!(status = %status, bytes = body.len(), "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %redact_url(&request.url)))]
    async fn send(&self, request: HttpRequest) -> SlackResult<HttpResponse> {
        let mut builder = self.builder_for(&request);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        self.execute(builder, request.timeout).await
    }

    #[instrument(skip(self, request, body), fields(method = %request.method, url = %redact_url(&request.url)))]
    async fn send_streaming(
        &self,
        request: HttpRequest,
        body: BodyStream,
    ) -> SlackResult<HttpResponse> {
        let builder = self
            .builder_for(&request)
            .body(reqwest::Body::wrap_stream(body));
        self.execute(builder, request.timeout).await
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
