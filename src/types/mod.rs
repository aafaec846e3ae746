//! Common types for the Slack API.
//!
//! Defines shared data structures used across services: identifier newtypes,
//! the `ok`/`error` response envelope, and the [`SlackApiResponse`] contract
//! every typed response implements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod channel;
pub mod file;
pub mod message;

pub use channel::*;
pub use file::*;
pub use message::*;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a raw identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Channel, group or IM identifier (`C…`, `G…`, `D…`)
    ChannelId
);
string_id!(
    /// User identifier
    UserId
);
string_id!(
    /// File identifier
    FileId
);
string_id!(
    /// Message timestamp, `"<seconds>.<sequence>"`
    Timestamp
);

/// Conversation family, derived from the id prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Public channel (`C…`)
    Channel,
    /// Private group (`G…`)
    Group,
    /// Direct message (`D…`)
    Im,
}

impl ChannelKind {
    /// Method namespace for this family, e.g. `groups` in `groups.mark`
    pub fn api_prefix(&self) -> &'static str {
        match self {
            ChannelKind::Channel => "channels",
            ChannelKind::Group => "groups",
            ChannelKind::Im => "im",
        }
    }
}

impl ChannelId {
    /// Classify by prefix; anything that is not `G` or `D` is a channel
    pub fn kind(&self) -> ChannelKind {
        match self.0.as_bytes().first() {
            Some(b'G') => ChannelKind::Group,
            Some(b'D') => ChannelKind::Im,
            _ => ChannelKind::Channel,
        }
    }
}

impl Timestamp {
    /// Parse the seconds part into a UTC datetime
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = self.0.split('.').next()?.parse::<i64>().ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// The `ok`/`error` wrapper present on every Web API response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Whether the request was successful
    #[serde(default)]
    pub ok: bool,
    /// Error code if not successful
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Warning message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Contract shared by all typed responses
pub trait SlackApiResponse {
    /// The decoded envelope
    fn envelope(&self) -> &ResponseEnvelope;

    /// Whether the service reported success
    fn is_ok(&self) -> bool {
        self.envelope().ok
    }

    /// Provider error code when the call failed
    fn error_message(&self) -> Option<&str> {
        self.envelope().error.as_deref()
    }
}

impl SlackApiResponse for ResponseEnvelope {
    fn envelope(&self) -> &ResponseEnvelope {
        self
    }
}

/// Implement [`SlackApiResponse`] for types with a flattened `envelope` field
macro_rules! impl_api_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::types::SlackApiResponse for $ty {
                fn envelope(&self) -> &$crate::types::ResponseEnvelope {
                    &self.envelope
                }
            }
        )+
    };
}
pub(crate) use impl_api_response;

/// Page-number pagination block used by file listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// Items per page
    #[serde(default)]
    pub count: i32,
    /// Total items
    #[serde(default)]
    pub total: i32,
    /// Current page
    #[serde(default)]
    pub page: i32,
    /// Total pages
    #[serde(default)]
    pub pages: i32,
}

impl Paging {
    /// Whether another page follows this one
    pub fn has_more(&self) -> bool {
        self.page < self.pages
    }
}

/// Reaction on a message, file or comment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Emoji name (without colons)
    #[serde(default)]
    pub name: String,
    /// Reaction count
    #[serde(default)]
    pub count: i32,
    /// Users who reacted
    #[serde(default)]
    pub users: Vec<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("C024BE91L", ChannelKind::Channel; "public channel")]
    #[test_case("G024BE91L", ChannelKind::Group; "private group")]
    #[test_case("D024BE91L", ChannelKind::Im; "direct message")]
    #[test_case("", ChannelKind::Channel; "empty id")]
    fn test_channel_kind(id: &str, expected: ChannelKind) {
        assert_eq!(ChannelId::new(id).kind(), expected);
    }

    #[test]
    fn test_timestamp_parsing() {
        let ts = Timestamp::new("1234567890.123456");
        assert_eq!(ts.to_datetime().unwrap().timestamp(), 1234567890);
        assert!(Timestamp::new("garbage").to_datetime().is_none());
    }

    #[test]
    fn test_envelope_decoding() {
        let env: ResponseEnvelope =
            serde_json::from_str(r#"{"ok":false,"error":"not_authed"}"#).unwrap();
        assert!(!env.is_ok());
        assert_eq!(env.error_message(), Some("not_authed"));

        let env: ResponseEnvelope = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!env.ok);
    }

    #[test]
    fn test_paging_has_more() {
        let paging = Paging {
            count: 100,
            total: 250,
            page: 2,
            pages: 3,
        };
        assert!(paging.has_more());
        assert!(!Paging::default().has_more());
    }
}
