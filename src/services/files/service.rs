//! Files service implementation.

use super::*;
use crate::client::dispatch::{require, Dispatcher};
use crate::errors::SlackResult;
use crate::types::FileId;
use crate::upload::UploadSource;
use async_trait::async_trait;
use tokio::io::AsyncRead;
use tracing::instrument;

/// Trait for files service operations
#[async_trait]
pub trait FilesServiceTrait: Send + Sync {
    /// Upload a file, streaming its content from `source`
    async fn upload(
        &self,
        request: UploadFileRequest,
        source: UploadSource,
    ) -> SlackResult<FileUploadResponse>;

    /// List files
    async fn list(&self, request: ListFilesRequest) -> SlackResult<FileListResponse>;

    /// Get file info with a page of its comments
    async fn info(&self, file: &FileId, count: u32, page: u32) -> SlackResult<FileResponse>;

    /// Comment on a file
    async fn add_comment(
        &self,
        file: &FileId,
        comment: &str,
        set_active: bool,
    ) -> SlackResult<CommentResponse>;
}

/// Files service implementation
#[derive(Clone, Debug)]
pub struct FilesService {
    dispatcher: Dispatcher,
}

impl FilesService {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Upload from any owned reader
    pub async fn upload_reader<R>(
        &self,
        request: UploadFileRequest,
        reader: R,
    ) -> SlackResult<FileUploadResponse>
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        self.upload(request, Box::new(reader)).await
    }
}

#[async_trait]
impl FilesServiceTrait for FilesService {
    #[instrument(skip(self, request, source), fields(filename = %request.filename))]
    async fn upload(
        &self,
        request: UploadFileRequest,
        source: UploadSource,
    ) -> SlackResult<FileUploadResponse> {
        self.dispatcher
            .upload("files.upload", &request.filename, request.to_params(), source)
            .await
    }

    #[instrument(skip(self, request))]
    async fn list(&self, request: ListFilesRequest) -> SlackResult<FileListResponse> {
        self.dispatcher.call("files.list", request.to_params()).await
    }

    #[instrument(skip(self), fields(file = %file))]
    async fn info(&self, file: &FileId, count: u32, page: u32) -> SlackResult<FileResponse> {
        require("file", file.as_str())?;
        let mut params = vec![("file".to_string(), file.to_string())];
        push_paging(&mut params, count, page);
        self.dispatcher.call("files.info", params).await
    }

    #[instrument(skip(self, comment), fields(file = %file))]
    async fn add_comment(
        &self,
        file: &FileId,
        comment: &str,
        set_active: bool,
    ) -> SlackResult<CommentResponse> {
        require("file", file.as_str())?;
        require("comment", comment)?;
        let params = vec![
            ("file".to_string(), file.to_string()),
            ("comment".to_string(), comment.to_string()),
            ("set_active".to_string(), set_active.to_string()),
        ];
        self.dispatcher.call("files.comments.add", params).await
    }
}
