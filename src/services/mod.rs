//! Service implementations for Slack API endpoints.
//!
//! Each service module provides methods for one family of Web API methods.

pub mod channels;
pub mod files;
pub mod groups;

pub use channels::{ChannelsService, ChannelsServiceTrait};
pub use files::{FilesService, FilesServiceTrait};
pub use groups::{GroupsService, GroupsServiceTrait};
