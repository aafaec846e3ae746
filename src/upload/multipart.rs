//! Incremental `multipart/form-data` writer.
//!
//! Parts are emitted as they are created, straight into the wrapped writer,
//! so a file part can be fed from a stream of any length without ever
//! holding the whole body in memory.

use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Characters that would break out of a quoted header parameter
const UNSAFE_PARAM_CHARS: &[char] = &['"', '\\', '\r', '\n'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Empty,
    InPart,
    Closed,
}

/// Writes a form-data body part by part
#[derive(Debug)]
pub struct MultipartWriter<W> {
    inner: W,
    boundary: String,
    state: State,
}

impl<W> MultipartWriter<W>
where
    W: AsyncWrite + Unpin,
{
    /// Wrap `inner` with a fresh random boundary
    pub fn new(inner: W) -> Self {
        Self::with_boundary(inner, generate_boundary())
    }

    /// Wrap `inner` using a caller-chosen boundary
    pub fn with_boundary(inner: W, boundary: impl Into<String>) -> Self {
        Self {
            inner,
            boundary: boundary.into(),
            state: State::Empty,
        }
    }

    /// The part delimiter, without leading dashes
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header
    pub fn form_data_content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Start a file part; its content is written with [`write_all`](Self::write_all)
    pub async fn create_form_file(&mut self, field: &str, filename: &str) -> io::Result<()> {
        let content_type = mime_guess::from_path(filename).first_or_octet_stream();
        let disposition = format!(
            "form-data; name=\"{}\"; filename=\"{}\"",
            sanitize_param(field, UNSAFE_PARAM_CHARS),
            sanitize_filename(filename)
        );
        self.create_part(&disposition, Some(content_type.essence_str()))
            .await
    }

    /// Write a complete text field as its own part
    pub async fn write_field(&mut self, name: &str, value: &str) -> io::Result<()> {
        let disposition = format!(
            "form-data; name=\"{}\"",
            sanitize_param(name, UNSAFE_PARAM_CHARS)
        );
        self.create_part(&disposition, None).await?;
        self.write_all(value.as_bytes()).await
    }

    /// Append bytes to the part currently open
    pub async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        if self.state != State::InPart {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no multipart part is open",
            ));
        }
        self.inner.write_all(data).await
    }

    /// Emit the closing delimiter and shut the underlying writer down
    pub async fn close(&mut self) -> io::Result<()> {
        if self.state == State::Closed {
            return Ok(());
        }
        let trailer = match self.state {
            State::InPart => format!("\r\n--{}--\r\n", self.boundary),
            _ => format!("--{}--\r\n", self.boundary),
        };
        self.state = State::Closed;
        self.inner.write_all(trailer.as_bytes()).await?;
        self.inner.flush().await?;
        self.inner.shutdown().await
    }

    /// Give back the wrapped writer
    pub fn into_inner(self) -> W {
        self.inner
    }

    async fn create_part(&mut self, disposition: &str, content_type: Option<&str>) -> io::Result<()> {
        let delimiter = match self.state {
            State::Empty => format!("--{}\r\n", self.boundary),
            State::InPart => format!("\r\n--{}\r\n", self.boundary),
            State::Closed => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "multipart writer already closed",
                ))
            }
        };

        let mut header = delimiter;
        header.push_str("Content-Disposition: ");
        header.push_str(disposition);
        header.push_str("\r\n");
        if let Some(content_type) = content_type {
            header.push_str("Content-Type: ");
            header.push_str(content_type);
            header.push_str("\r\n");
        }
        header.push_str("\r\n");

        self.inner.write_all(header.as_bytes()).await?;
        self.state = State::InPart;
        Ok(())
    }
}

fn generate_boundary() -> String {
    format!("slack-form-{}", uuid::Uuid::new_v4().simple())
}

fn sanitize_param(value: &str, unsafe_chars: &[char]) -> String {
    value.replace(unsafe_chars, "_")
}

fn sanitize_filename(filename: &str) -> String {
    sanitize_param(filename, &['"', '\\', '/', '\r', '\n'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_file_then_fields() {
        let mut writer = MultipartWriter::with_boundary(Vec::new(), "XYZ");
        writer.create_form_file("file", "report.txt").await.unwrap();
        writer.write_all(b"hel").await.unwrap();
        writer.write_all(b"lo").await.unwrap();
        writer.write_field("title", "report").await.unwrap();
        writer.close().await.unwrap();

        let body = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            body,
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"report.txt\"\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             hello\r\n\
             --XYZ\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\
             \r\n\
             report\r\n\
             --XYZ--\r\n"
        );
    }

    #[tokio::test]
    async fn test_unknown_extension_is_octet_stream() {
        let mut writer = MultipartWriter::with_boundary(Vec::new(), "b");
        writer.create_form_file("file", "blob.unknownext").await.unwrap();
        writer.close().await.unwrap();

        let body = String::from_utf8(writer.into_inner()).unwrap();
        assert!(body.contains("Content-Type: application/octet-stream\r\n"));
    }

    #[tokio::test]
    async fn test_header_params_are_sanitized() {
        let mut writer = MultipartWriter::with_boundary(Vec::new(), "b");
        writer
            .create_form_file("fi\"le", "../evil\"\r\nname.txt")
            .await
            .unwrap();
        writer.close().await.unwrap();

        let body = String::from_utf8(writer.into_inner()).unwrap();
        assert!(body.contains("name=\"fi_le\"; filename=\".._evil___name.txt\""));
    }

    #[tokio::test]
    async fn test_write_outside_part_is_rejected() {
        let mut writer = MultipartWriter::with_boundary(Vec::new(), "b");
        let err = writer.write_all(b"orphan").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        writer.close().await.unwrap();
        assert!(writer.write_field("late", "x").await.is_err());
        assert_eq!(writer.into_inner(), b"--b--\r\n".to_vec());
    }

    #[test]
    fn test_random_boundary_and_content_type() {
        let a = MultipartWriter::new(Vec::<u8>::new());
        let b = MultipartWriter::new(Vec::<u8>::new());
        assert_ne!(a.boundary(), b.boundary());
        assert_eq!(
            a.form_data_content_type(),
            format!("multipart/form-data; boundary={}", a.boundary())
        );
        assert!(a.boundary().len() <= 70);
    }
}
