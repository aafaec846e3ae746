//! Response types for files service.

use crate::types::{impl_api_response, Comment, File, Paging, ResponseEnvelope};
use serde::Deserialize;

/// Response from files.upload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileUploadResponse {
    /// Envelope
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// The stored file
    #[serde(default)]
    pub file: File,
}

/// Response from files.list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileListResponse {
    /// Envelope
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// Files on this page
    #[serde(default)]
    pub files: Vec<File>,
    /// Paging info
    #[serde(default)]
    pub paging: Paging,
}

/// Response from files.info
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileResponse {
    /// Envelope
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// File info
    #[serde(default)]
    pub file: File,
    /// Comments on this page
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Paging over the comments
    #[serde(default)]
    pub paging: Paging,
}

/// Response from files.comments.add
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentResponse {
    /// Envelope
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// The new comment
    #[serde(default)]
    pub comment: Comment,
}

impl_api_response!(FileUploadResponse, FileListResponse, FileResponse, CommentResponse);
