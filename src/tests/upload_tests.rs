//! Streaming upload tests.

use super::{mock_client, TEST_TOKEN};
use crate::config::SlackConfigBuilder;
use crate::errors::{EncodingError, SlackError, TransportError};
use crate::fixtures;
use crate::mocks::{MockFailure, MockHttpTransport, MockResponse};
use crate::services::files::UploadFileRequest;
use crate::services::FilesServiceTrait;
use crate::upload::{COPY_BUFFER_SIZE, FILE_FIELD, PIPE_CAPACITY};
use crate::SlackClientImpl;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, ReadBuf};
use tracing::field::{Field, Visit};
use tracing::{span, Event, Metadata, Subscriber};

/// Yields `prefix`, then fails every read
struct FailingReader {
    prefix: Vec<u8>,
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.prefix.is_empty() {
            return Poll::Ready(Err(io::Error::other("disk gone")));
        }
        let n = self.prefix.len().min(buf.remaining());
        let chunk: Vec<u8> = self.prefix.drain(..n).collect();
        buf.put_slice(&chunk);
        Poll::Ready(Ok(()))
    }
}

/// Produces `remaining` bytes of filler and counts what was pulled
struct CountingReader {
    remaining: usize,
    pulled: Arc<AtomicU64>,
}

impl AsyncRead for CountingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let n = self.remaining.min(buf.remaining());
        buf.put_slice(&vec![b'x'; n]);
        self.remaining -= n;
        self.pulled.fetch_add(n as u64, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

/// Panics on the first read
struct PanickingReader;

impl AsyncRead for PanickingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        panic!("source exploded")
    }
}

/// Subscriber keeping the `content_type` of every request dump
#[derive(Clone, Default)]
struct DumpRecorder {
    content_types: Arc<Mutex<Vec<String>>>,
}

struct ContentTypeVisitor<'a>(&'a mut Option<String>);

impl Visit for ContentTypeVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "content_type" {
            *self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
}

impl Subscriber for DumpRecorder {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &span::Attributes<'_>) -> span::Id {
        span::Id::from_u64(1)
    }

    fn record(&self, _span: &span::Id, _values: &span::Record<'_>) {}

    fn record_follows_from(&self, _span: &span::Id, _follows: &span::Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut found = None;
        event.record(&mut ContentTypeVisitor(&mut found));
        if let Some(content_type) = found {
            self.content_types.lock().push(content_type);
        }
    }

    fn enter(&self, _span: &span::Id) {}

    fn exit(&self, _span: &span::Id) {}
}

fn upload_ok(id: &str, name: &str) -> MockResponse {
    MockResponse::json(&json!({"ok": true, "file": {"id": id, "name": name}}))
}

#[tokio::test]
async fn test_upload_report() {
    let (client, transport) = mock_client(MockHttpTransport::new().add_response(upload_ok("F1", "report.txt")));

    let request = UploadFileRequest::new("report.txt")
        .title("report")
        .filetype("text")
        .channels(["C123"]);
    let response = client
        .files()
        .upload_reader(request, &b"hello"[..])
        .await
        .unwrap();

    assert_eq!(response.file.id.as_str(), "F1");
    assert_eq!(response.file.name, "report.txt");
    assert!(response.envelope.error.is_none());

    let recorded = transport.last_request().unwrap();
    assert_eq!(recorded.url, "https://slack.com/api/files.upload");
    assert_eq!(recorded.method, http::Method::POST);
    assert!(recorded.streamed);
    assert!(recorded
        .content_type()
        .unwrap()
        .starts_with("multipart/form-data; boundary="));

    let parts = recorded.multipart_parts().unwrap();
    let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec![FILE_FIELD, "title", "filetype", "filename", "channels", "token"]
    );
    assert_eq!(parts[0].filename.as_deref(), Some("report.txt"));
    assert_eq!(parts[0].content_type.as_deref(), Some("text/plain"));
    assert_eq!(parts[0].text(), "hello");
    assert_eq!(parts[1].text(), "report");
    assert_eq!(parts[2].text(), "text");
    assert_eq!(parts[3].text(), "report.txt");
    assert_eq!(parts[4].text(), "C123");
    assert_eq!(parts[5].text(), TEST_TOKEN);
}

#[tokio::test]
async fn test_upload_body_matches_binary_source() {
    let content: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
    let (client, transport) =
        mock_client(MockHttpTransport::new().add_response(upload_ok("F2", "blob.bin")));

    let request = UploadFileRequest::new("blob.bin")
        .initial_comment("see attached")
        .channels(["C1", "G2"]);
    client
        .files()
        .upload(request, Box::new(std::io::Cursor::new(content.clone())))
        .await
        .unwrap();

    let parts = transport.last_request().unwrap().multipart_parts().unwrap();
    assert_eq!(parts.len(), 5);
    let file_parts: Vec<_> = parts.iter().filter(|p| p.filename.is_some()).collect();
    assert_eq!(file_parts.len(), 1);
    assert_eq!(file_parts[0].data, content);
    assert_eq!(
        file_parts[0].content_type.as_deref(),
        Some("application/octet-stream")
    );
    assert!(parts
        .iter()
        .any(|p| p.name == "initial_comment" && p.text() == "see attached"));
    assert!(parts.iter().any(|p| p.name == "channels" && p.text() == "C1,G2"));
}

#[tokio::test]
async fn test_empty_filename_sends_nothing() {
    let (client, transport) = mock_client(MockHttpTransport::new().add_response(upload_ok("F1", "x")));

    let err = client
        .files()
        .upload_reader(UploadFileRequest::new(""), &b"hello"[..])
        .await
        .unwrap_err();

    assert!(matches!(err, SlackError::Validation(_)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_source_failure_wins_over_ok_response() {
    let (client, transport) = mock_client(MockHttpTransport::new().add_response(upload_ok("F1", "a.txt")));

    let source = FailingReader {
        prefix: b"hello".to_vec(),
    };
    let err = client
        .files()
        .upload_reader(UploadFileRequest::new("a.txt"), source)
        .await
        .unwrap_err();

    match err {
        SlackError::Encoding(EncodingError::SourceRead { bytes_read, .. }) => {
            assert_eq!(bytes_read, 5)
        }
        other => panic!("expected a source read failure, got {other:?}"),
    }
    // The truncated body still went out.
    assert_eq!(transport.call_count(), 1);
    assert!(transport
        .last_request()
        .unwrap()
        .multipart_parts()
        .is_none());
}

#[tokio::test]
async fn test_encoder_panic_is_reported_as_aborted() {
    let (client, transport) = mock_client(MockHttpTransport::new().add_response(upload_ok("F1", "a.txt")));

    let err = client
        .files()
        .upload_reader(UploadFileRequest::new("a.txt"), PanickingReader)
        .await
        .unwrap_err();

    assert!(matches!(err, SlackError::Encoding(EncodingError::Aborted)));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_early_response_is_returned_when_body_is_cut_off() {
    let (client, transport) = mock_client(MockHttpTransport::new().add_response(
        MockResponse::json(&fixtures::error("not_authed")).with_read_limit(COPY_BUFFER_SIZE),
    ));

    let source = CountingReader {
        remaining: 16 * PIPE_CAPACITY,
        pulled: Arc::new(AtomicU64::new(0)),
    };
    let err = client
        .files()
        .upload_reader(UploadFileRequest::new("big.bin"), source)
        .await
        .unwrap_err();

    assert!(matches!(err, SlackError::Service(_)));
    assert_eq!(err.service_message(), Some("not_authed"));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_traced_upload_dumps_multipart_content_type() {
    let recorder = DumpRecorder::default();
    let _guard = tracing::subscriber::set_default(recorder.clone());

    let transport = Arc::new(MockHttpTransport::new().add_response(upload_ok("F1", "a.txt")));
    let config = SlackConfigBuilder::new()
        .token(TEST_TOKEN)
        .unwrap()
        .trace_requests(true)
        .build()
        .unwrap();
    let client = SlackClientImpl::with_transport(config, transport).unwrap();

    client
        .files()
        .upload_reader(UploadFileRequest::new("a.txt"), &b"x"[..])
        .await
        .unwrap();

    let content_types = recorder.content_types.lock().clone();
    assert_eq!(content_types.len(), 1);
    assert!(content_types[0].starts_with("multipart/form-data; boundary="));
}

#[tokio::test]
async fn test_not_ok_envelope_is_service_error() {
    let (client, _transport) = mock_client(
        MockHttpTransport::new().add_response(MockResponse::json(&fixtures::error("not_authed"))),
    );

    let err = client
        .files()
        .upload_reader(UploadFileRequest::new("a.txt"), &b"hello"[..])
        .await
        .unwrap_err();

    assert!(matches!(err, SlackError::Service(_)));
    assert_eq!(err.service_message(), Some("not_authed"));
}

#[tokio::test]
async fn test_non_success_status_is_service_error() {
    let (client, _transport) = mock_client(
        MockHttpTransport::new().add_response(MockResponse::with_status(503, "unavailable")),
    );

    let err = client
        .files()
        .upload_reader(UploadFileRequest::new("a.txt"), &b"hello"[..])
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), Some(503));
}

#[tokio::test]
async fn test_transport_hang_up_reports_transport_error() {
    let (client, _transport) = mock_client(MockHttpTransport::new().add_response(
        MockResponse::failure(MockFailure::ConnectionFailed("reset".to_string())).with_read_limit(0),
    ));

    let source = CountingReader {
        remaining: 4 * PIPE_CAPACITY,
        pulled: Arc::new(AtomicU64::new(0)),
    };
    let err = client
        .files()
        .upload_reader(UploadFileRequest::new("big.bin"), source)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SlackError::Transport(TransportError::ConnectionFailed { .. })
    ));
}

#[tokio::test]
async fn test_upload_uses_upload_timeout() {
    let transport = Arc::new(MockHttpTransport::new().add_response(upload_ok("F1", "a.txt")));
    let config = SlackConfigBuilder::new()
        .token(TEST_TOKEN)
        .unwrap()
        .upload_timeout(Duration::from_secs(600))
        .build()
        .unwrap();
    let client = SlackClientImpl::with_transport(config, transport.clone()).unwrap();

    client
        .files()
        .upload_reader(UploadFileRequest::new("a.txt"), &b"x"[..])
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().unwrap().timeout,
        Some(Duration::from_secs(600))
    );
}

#[tokio::test(start_paused = true)]
async fn test_producer_is_held_back_by_slow_consumer() {
    const TOTAL: usize = 10 * 1024 * 1024;
    let slack = (PIPE_CAPACITY + 2 * COPY_BUFFER_SIZE) as u64;

    let mock = MockHttpTransport::new()
        .add_response(upload_ok("F9", "big.bin"))
        .with_read_delay(Duration::from_millis(1));
    let consumed = mock.consumed_counter();
    let (client, _transport) = mock_client(mock);

    let pulled = Arc::new(AtomicU64::new(0));
    let source = CountingReader {
        remaining: TOTAL,
        pulled: pulled.clone(),
    };
    let upload = tokio::spawn(async move {
        client
            .files()
            .upload_reader(UploadFileRequest::new("big.bin"), source)
            .await
    });

    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(3)).await;
        let pulled = pulled.load(Ordering::SeqCst);
        let consumed = consumed.load(Ordering::SeqCst);
        assert!(
            pulled <= consumed + slack,
            "producer ran ahead: pulled {pulled}, consumed {consumed}"
        );
    }
    assert!(pulled.load(Ordering::SeqCst) < TOTAL as u64);

    let response = upload.await.unwrap().unwrap();
    assert_eq!(response.file.id.as_str(), "F9");
    assert_eq!(pulled.load(Ordering::SeqCst), TOTAL as u64);
    assert!(consumed.load(Ordering::SeqCst) > TOTAL as u64);
}
