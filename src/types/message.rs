//! Message types.

use super::{Reaction, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Message as embedded in channel payloads (`latest`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// Message type, usually `message`
    #[serde(rename = "type", default)]
    pub message_type: String,
    /// Message subtype
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Author
    #[serde(default)]
    pub user: UserId,
    /// Message text
    #[serde(default)]
    pub text: String,
    /// Message timestamp (unique per channel)
    #[serde(default)]
    pub ts: Timestamp,
    /// Reactions on this message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
}
