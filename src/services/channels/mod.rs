//! Channels service for Slack API.
//!
//! Archive, create, inspect and list public channels, and move the read
//! cursor of any conversation.

mod responses;
mod service;

pub use responses::*;
pub use service::*;
