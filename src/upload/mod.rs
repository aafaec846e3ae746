//! Streaming multipart upload pipeline.
//!
//! An upload never holds the whole file in memory. A background encoder
//! writes the multipart body into one end of a bounded in-process pipe while
//! the transport reads the other end as the request body. Once the transport
//! returns, the encoder's outcome is read from a one-shot slot:
//!
//! ```text
//!  source ──read──▶ encoder task ──write──▶ duplex pipe ──read──▶ transport
//!                        │                                           │
//!                        └──── oneshot outcome ──────▶ caller ◀──────┘
//! ```
//!
//! The pipe's bounded capacity is the backpressure: the encoder suspends on
//! writes until the transport has drained enough of the body.
//!
//! A server may answer before it has read the whole body, and the HTTP
//! client may keep the body stream alive after handing back the response.
//! So the encoder is cancelled as soon as the transport returns; one that had
//! already finished keeps its own outcome.

pub mod multipart;
mod producer;

pub use multipart::MultipartWriter;

use crate::errors::{EncodingError, SlackResult, TransportError, ValidationError};
use crate::observability::RequestTrace;
use crate::transport::{BodyStream, HttpRequest, HttpResponse, HttpTransport};
use http::header::{HeaderValue, CONTENT_TYPE};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Bytes the pipe buffers before the encoder has to wait for the transport
pub const PIPE_CAPACITY: usize = 64 * 1024;

/// Chunk size used when copying the source and reading the pipe
pub const COPY_BUFFER_SIZE: usize = 16 * 1024;

/// Form field holding the file content
pub const FILE_FIELD: &str = "file";

/// Read-once input stream for an upload
pub type UploadSource = Box<dyn AsyncRead + Send + Unpin>;

/// Everything the encoder needs to produce one body
pub struct MultipartUpload {
    /// Filename reported in the file part
    pub filename: String,
    /// Scalar fields written after the file part, in order
    pub fields: Vec<(String, String)>,
    /// File content
    pub source: UploadSource,
}

impl std::fmt::Debug for MultipartUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipartUpload")
            .field("filename", &self.filename)
            .field(
                "fields",
                &self.fields.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Send `upload` as the multipart body of `request`
///
/// Fails with a validation error, before anything is sent, when the filename
/// is empty. An encoder failure is returned in preference to whatever the
/// transport produced, unless the only thing that went wrong in the encoder
/// was the transport hanging up on it or finishing first. The request is
/// dumped to `trace` once its multipart `Content-Type` is set.
#[instrument(skip(transport, request, upload, trace), fields(url = %crate::observability::redact_url(&request.url), filename = %upload.filename))]
pub async fn send_multipart(
    transport: &dyn HttpTransport,
    mut request: HttpRequest,
    upload: MultipartUpload,
    trace: &RequestTrace,
) -> SlackResult<HttpResponse> {
    if upload.filename.is_empty() {
        return Err(ValidationError::MissingField { field: "filename" }.into());
    }

    let (body_writer, body_reader) = tokio::io::duplex(PIPE_CAPACITY);
    let writer = MultipartWriter::new(body_writer);

    let content_type = HeaderValue::from_str(&writer.form_data_content_type())
        .map_err(|e| TransportError::Http(e.to_string()))?;
    request.headers.insert(CONTENT_TYPE, content_type);
    trace.dump_request(&request, &upload.fields);

    let cancel = CancellationToken::new();
    let outcome = producer::spawn_encoder(writer, upload, cancel.clone());

    let body: BodyStream = Box::new(ReaderStream::with_capacity(body_reader, COPY_BUFFER_SIZE));
    let sent = transport.send_streaming(request, body).await;

    cancel.cancel();
    let encoded = outcome.await.unwrap_or(Err(EncodingError::Aborted));

    resolve(sent, encoded)
}

fn resolve(
    sent: SlackResult<HttpResponse>,
    encoded: Result<(), EncodingError>,
) -> SlackResult<HttpResponse> {
    match (sent, encoded) {
        (sent, Err(encode_err)) if encode_err.is_body_closed() => {
            debug!(error = %encode_err, "Encoder stopped before the end of the body");
            sent
        }
        (_, Err(encode_err)) => Err(encode_err.into()),
        (sent, Ok(())) => sent,
    }
}
