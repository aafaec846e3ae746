//! File and file comment types.

use super::{ChannelId, FileId, Reaction, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment on a file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID
    #[serde(default)]
    pub id: String,
    /// Time the comment was posted (Unix seconds)
    #[serde(default)]
    pub timestamp: i64,
    /// Author
    #[serde(default)]
    pub user: UserId,
    /// Comment text
    #[serde(default)]
    pub comment: String,
    /// Creation time (Unix seconds)
    #[serde(default)]
    pub created: i64,
    /// Reactions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
}

/// File metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct File {
    /// File ID
    #[serde(default)]
    pub id: FileId,
    /// Creation time (Unix seconds)
    #[serde(default)]
    pub created: i64,

    /// File name
    #[serde(default)]
    pub name: String,
    /// Title
    #[serde(default)]
    pub title: String,
    /// MIME type
    #[serde(default)]
    pub mimetype: String,
    /// Slack file type, e.g. `text`
    #[serde(default)]
    pub filetype: String,
    /// Human readable type
    #[serde(default)]
    pub pretty_type: String,
    /// Uploader
    #[serde(default, rename = "user")]
    pub user_id: UserId,

    /// Upload mode (`hosted`, `external`, `snippet`, `post`)
    #[serde(default)]
    pub mode: String,
    /// Whether editable
    #[serde(default)]
    pub editable: bool,
    /// Whether stored outside Slack
    #[serde(default)]
    pub is_external: bool,
    /// External storage type
    #[serde(default)]
    pub external_type: String,

    /// Size in bytes
    #[serde(default)]
    pub size: u64,

    /// Public URL
    #[serde(default)]
    pub url: String,
    /// Public download URL
    #[serde(default)]
    pub url_download: String,
    /// Authenticated URL
    #[serde(default)]
    pub url_private: String,
    /// Authenticated download URL
    #[serde(default)]
    pub url_private_download: String,

    /// 64px thumbnail
    #[serde(default)]
    pub thumb_64: String,
    /// 80px thumbnail
    #[serde(default)]
    pub thumb_80: String,
    /// 360px thumbnail
    #[serde(default)]
    pub thumb_360: String,
    /// 360px animated thumbnail
    #[serde(default)]
    pub thumb_360_gif: String,
    /// 360px thumbnail width
    #[serde(default)]
    pub thumb_360_w: u32,
    /// 360px thumbnail height
    #[serde(default)]
    pub thumb_360_h: u32,

    /// Permalink
    #[serde(default)]
    pub permalink: String,
    /// Edit link
    #[serde(default)]
    pub edit_link: String,
    /// Text preview
    #[serde(default)]
    pub preview: String,
    /// Highlighted preview
    #[serde(default)]
    pub preview_highlight: String,
    /// Line count
    #[serde(default)]
    pub lines: u32,
    /// Lines not in the preview
    #[serde(default)]
    pub lines_more: u32,

    /// Whether shared to a public channel
    #[serde(default)]
    pub is_public: bool,
    /// Whether the public URL is active
    #[serde(default)]
    pub public_url_shared: bool,
    /// Channels shared to
    #[serde(default)]
    pub channels: Vec<ChannelId>,
    /// Groups shared to
    #[serde(default)]
    pub groups: Vec<ChannelId>,
    /// Comment posted with the upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_comment: Option<Comment>,
    /// Star count
    #[serde(default)]
    pub num_stars: u32,
    /// Whether the caller starred it
    #[serde(default)]
    pub is_starred: bool,

    /// Reactions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
}

impl File {
    /// Creation time as a datetime
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created, 0)
    }
}
