//! Channel, group and IM types.

use super::{ChannelId, Message, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Topic or purpose of a conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTopicPurpose {
    /// Text value
    #[serde(default)]
    pub value: String,
    /// Who set it
    #[serde(default)]
    pub creator: UserId,
    /// When it was set (Unix seconds)
    #[serde(default)]
    pub last_set: i64,
}

/// Fields shared by channels, groups and IMs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseChannel {
    /// Conversation ID
    #[serde(default)]
    pub id: ChannelId,
    /// Name (without #)
    #[serde(default)]
    pub name: String,
    /// Creation time (Unix seconds)
    #[serde(default)]
    pub created: i64,
    /// Creator user ID
    #[serde(default)]
    pub creator: UserId,
    /// Whether archived
    #[serde(default)]
    pub is_archived: bool,
    /// Whether open
    #[serde(default)]
    pub is_open: bool,
    /// Member user IDs
    #[serde(default)]
    pub members: Vec<UserId>,
    /// Topic
    #[serde(default)]
    pub topic: ChannelTopicPurpose,
    /// Purpose
    #[serde(default)]
    pub purpose: ChannelTopicPurpose,
    /// Last read marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_read: Option<Timestamp>,
    /// Latest message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<Message>,
    /// Unread messages
    #[serde(default)]
    pub unread_count: i32,
    /// Unread messages the client should display
    #[serde(default)]
    pub unread_count_display: i32,
    /// Member count
    #[serde(default)]
    pub num_members: i32,
}

/// Public channel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Channel {
    /// Shared fields
    #[serde(flatten)]
    pub base: BaseChannel,
    /// Whether this is #general
    #[serde(default)]
    pub is_general: bool,
    /// Always true for channels
    #[serde(default)]
    pub is_channel: bool,
    /// Whether the caller is a member
    #[serde(default)]
    pub is_member: bool,
}

/// Private group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Group {
    /// Shared fields
    #[serde(flatten)]
    pub base: BaseChannel,
    /// Always true for groups
    #[serde(default)]
    pub is_group: bool,
}

/// Direct message conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Im {
    /// Shared fields
    #[serde(flatten)]
    pub base: BaseChannel,
    /// Always true for IMs
    #[serde(default)]
    pub is_im: bool,
    /// The other participant
    #[serde(default)]
    pub user: UserId,
    /// Whether that user was deleted
    #[serde(default)]
    pub is_user_deleted: bool,
}
