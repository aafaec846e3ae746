//! Request types for files service.

use crate::client::dispatch::{append_not_empty, Params};
use crate::types::{ChannelId, UserId};

/// Metadata for a file upload
///
/// The content itself is passed separately, as a reader, so it never has to
/// be held in memory.
#[derive(Debug, Clone, Default)]
pub struct UploadFileRequest {
    /// Filename reported to the service, required
    pub filename: String,
    /// Title
    pub title: Option<String>,
    /// Slack file type, e.g. `text`
    pub filetype: Option<String>,
    /// Message posted with the file
    pub initial_comment: Option<String>,
    /// Channels to share the file to
    pub channels: Vec<ChannelId>,
}

impl UploadFileRequest {
    /// Create a new request
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// Set title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set file type
    pub fn filetype(mut self, filetype: impl Into<String>) -> Self {
        self.filetype = Some(filetype.into());
        self
    }

    /// Set initial comment
    pub fn initial_comment(mut self, comment: impl Into<String>) -> Self {
        self.initial_comment = Some(comment.into());
        self
    }

    /// Set channels to share with
    pub fn channels<I, C>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ChannelId>,
    {
        self.channels = channels.into_iter().map(Into::into).collect();
        self
    }

    /// Scalar form fields, empty ones left out
    pub(crate) fn to_params(&self) -> Params {
        let mut params = Params::new();
        append_not_empty(&mut params, "title", self.title.as_deref().unwrap_or_default());
        append_not_empty(&mut params, "filetype", self.filetype.as_deref().unwrap_or_default());
        append_not_empty(&mut params, "filename", &self.filename);
        append_not_empty(
            &mut params,
            "initial_comment",
            self.initial_comment.as_deref().unwrap_or_default(),
        );
        append_not_empty(&mut params, "channels", join_ids(&self.channels));
        params
    }
}

/// Request to list files
#[derive(Debug, Clone, Default)]
pub struct ListFilesRequest {
    /// Filter by uploader
    pub user: Option<UserId>,
    /// Only files created after this time (Unix seconds)
    pub ts_from: Option<i64>,
    /// Only files created before this time (Unix seconds)
    pub ts_to: Option<i64>,
    /// Filter by type (`spaces`, `snippets`, `images`, `gdocs`, `zips`, `pdfs`)
    pub types: Vec<String>,
    /// Page size; zero leaves it to the service
    pub count: u32,
    /// Page number, starting at 1
    pub page: u32,
}

impl ListFilesRequest {
    /// Create a new request
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by user
    pub fn user(mut self, user: impl Into<UserId>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Restrict to a creation time window
    pub fn between(mut self, ts_from: i64, ts_to: i64) -> Self {
        self.ts_from = Some(ts_from);
        self.ts_to = Some(ts_to);
        self
    }

    /// Add a type filter
    pub fn of_type(mut self, file_type: impl Into<String>) -> Self {
        self.types.push(file_type.into());
        self
    }

    /// Set page size
    pub fn count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set page
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub(crate) fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(user) = &self.user {
            append_not_empty(&mut params, "user", user.as_str());
        }
        if let Some(ts_from) = self.ts_from {
            append_not_empty(&mut params, "ts_from", ts_from.to_string());
        }
        if let Some(ts_to) = self.ts_to {
            append_not_empty(&mut params, "ts_to", ts_to.to_string());
        }
        append_not_empty(&mut params, "types", self.types.join(","));
        push_paging(&mut params, self.count, self.page);
        params
    }
}

/// `page` only past the first page, `count` only when set
pub(crate) fn push_paging(params: &mut Params, count: u32, page: u32) {
    if page > 1 {
        params.push(("page".to_string(), page.to_string()));
    }
    if count > 0 {
        params.push(("count".to_string(), count.to_string()));
    }
}

fn join_ids(ids: &[ChannelId]) -> String {
    ids.iter()
        .map(ChannelId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
