//! Background encoder feeding the upload pipe.

use super::multipart::MultipartWriter;
use super::{MultipartUpload, COPY_BUFFER_SIZE, FILE_FIELD};
use crate::errors::EncodingError;
use std::io;
use tokio::io::{AsyncReadExt, AsyncWrite};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Terminal outcome of one encoder run
pub(crate) type EncodeOutcome = Result<(), EncodingError>;

/// Spawn the encoder and return the slot its outcome will be sent through
///
/// The writer is moved into the task and dropped when the task ends, on
/// every path, which is what lets the reading side see end-of-body.
/// Cancelling `cancel` stops a pending source read or pipe write and reports
/// [`EncodingError::Cancelled`]; an encoder that already finished keeps its
/// own outcome.
pub(crate) fn spawn_encoder<W>(
    writer: MultipartWriter<W>,
    upload: MultipartUpload,
    cancel: CancellationToken,
) -> oneshot::Receiver<EncodeOutcome>
where
    W: AsyncWrite + Send + Unpin + 'static,
{
    let (outcome_tx, outcome_rx) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = tokio::select! {
            biased;
            outcome = encode(writer, upload) => outcome,
            _ = cancel.cancelled() => Err(EncodingError::Cancelled),
        };
        if let Err(err) = &outcome {
            debug!(error = %err, "Multipart encoder failed");
        }
        // The caller may have been cancelled; nobody is left to tell.
        let _ = outcome_tx.send(outcome);
    });
    outcome_rx
}

async fn encode<W>(mut writer: MultipartWriter<W>, upload: MultipartUpload) -> EncodeOutcome
where
    W: AsyncWrite + Unpin,
{
    let MultipartUpload {
        filename,
        fields,
        mut source,
    } = upload;

    writer
        .create_form_file(FILE_FIELD, &filename)
        .await
        .map_err(|e| write_error(FILE_FIELD, e))?;

    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut copied: u64 = 0;
    loop {
        let n = source
            .read(&mut buf)
            .await
            .map_err(|source| EncodingError::SourceRead {
                bytes_read: copied,
                source,
            })?;
        if n == 0 {
            break;
        }
        writer
            .write_all(&buf[..n])
            .await
            .map_err(|e| write_error(FILE_FIELD, e))?;
        copied += n as u64;
    }
    trace!(bytes = copied, "File part written");

    for (name, value) in &fields {
        writer
            .write_field(name, value)
            .await
            .map_err(|e| write_error(name, e))?;
    }

    writer
        .close()
        .await
        .map_err(|e| write_error("closing delimiter", e))
}

fn write_error(part: &str, err: io::Error) -> EncodingError {
    if err.kind() == io::ErrorKind::BrokenPipe {
        EncodingError::BodyClosed(err)
    } else {
        EncodingError::PartWrite {
            part: part.to_string(),
            source: err,
        }
    }
}
