//! Request dispatch shared by every API method.
//!
//! Ordinary calls go out as form-encoded POSTs; uploads go through the
//! streaming pipeline. Both paths share token injection, the trace hooks and
//! response decoding.

use crate::auth::AuthManager;
use crate::config::SlackConfig;
use crate::errors::{ServiceError, SlackError, SlackResult, ValidationError};
use crate::observability::RequestTrace;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::types::{ResponseEnvelope, SlackApiResponse};
use crate::upload::{send_multipart, MultipartUpload, UploadSource};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Form parameters of one call, in the order they are sent
pub type Params = Vec<(String, String)>;

/// Sends API methods on behalf of the services
#[derive(Clone)]
pub(crate) struct Dispatcher {
    config: Arc<SlackConfig>,
    auth: AuthManager,
    transport: Arc<dyn HttpTransport>,
}

impl Dispatcher {
    pub(crate) fn new(
        config: Arc<SlackConfig>,
        auth: AuthManager,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            config,
            auth,
            transport,
        }
    }

    /// Call `method` with form-encoded `params` and decode the answer
    #[instrument(skip(self, params), fields(method = %method))]
    pub(crate) async fn call<T>(&self, method: &str, mut params: Params) -> SlackResult<T>
    where
        T: DeserializeOwned + SlackApiResponse,
    {
        self.auth.append_token(&mut params)?;
        let request = HttpRequest::form(
            self.config.build_url(method),
            self.auth.default_headers(),
            &params,
        )
        .with_timeout(Some(self.config.timeout));

        let trace = RequestTrace::start(self.config.trace_requests, method);
        trace.dump_request(&request, &params);
        let result = self.transport.send(request).await;
        trace.finish(&result);

        decode_response(result?)
    }

    /// Upload `source` as the file part of a multipart call to `method`
    #[instrument(skip(self, params, source), fields(method = %method, filename = %filename))]
    pub(crate) async fn upload<T>(
        &self,
        method: &str,
        filename: &str,
        mut params: Params,
        source: UploadSource,
    ) -> SlackResult<T>
    where
        T: DeserializeOwned + SlackApiResponse,
    {
        require("filename", filename)?;
        self.auth.append_token(&mut params)?;
        let request = HttpRequest::post(self.config.build_url(method), self.auth.default_headers())
            .with_timeout(self.config.upload_timeout);

        let trace = RequestTrace::start(self.config.trace_requests, method);
        let upload = MultipartUpload {
            filename: filename.to_string(),
            fields: params,
            source,
        };
        let result = send_multipart(self.transport.as_ref(), request, upload, &trace).await;
        trace.finish(&result);

        decode_response(result?)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.config.base_url.as_str())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

/// Turn a raw response into `T`, or into the error it describes
///
/// A non-2xx status is a service error whether or not the body decodes; the
/// envelope's `error` is used as the message when there is one. A 2xx body
/// that decodes with `ok: false` is a service error carrying that code.
pub(crate) fn decode_response<T>(response: HttpResponse) -> SlackResult<T>
where
    T: DeserializeOwned + SlackApiResponse,
{
    if !response.is_success() {
        let message = serde_json::from_slice::<ResponseEnvelope>(&response.body)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_else(|| {
                response
                    .status
                    .canonical_reason()
                    .unwrap_or("http_error")
                    .to_string()
            });
        return Err(ServiceError {
            message,
            status: Some(response.status.as_u16()),
        }
        .into());
    }

    let decoded: T = serde_json::from_slice(&response.body)?;
    if !decoded.is_ok() {
        debug!(error = ?decoded.error_message(), "Service rejected the call");
        return Err(SlackError::from_envelope(decoded.error_message()));
    }
    if let Some(warning) = &decoded.envelope().warning {
        debug!(warning = %warning, "Service returned a warning");
    }
    Ok(decoded)
}

/// Push `key=value` unless `value` is empty
pub fn append_not_empty(params: &mut Params, key: &str, value: impl AsRef<str>) {
    let value = value.as_ref();
    if !value.is_empty() {
        params.push((key.to_string(), value.to_string()));
    }
}

/// Fail with a validation error when a required argument is empty
pub(crate) fn require(field: &'static str, value: &str) -> SlackResult<()> {
    if value.is_empty() {
        return Err(ValidationError::MissingField { field }.into());
    }
    Ok(())
}
