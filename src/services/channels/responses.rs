//! Response types for channels service.

use crate::types::{impl_api_response, Channel, ResponseEnvelope};
use serde::Deserialize;

/// Response from channels.create and channels.info
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelResponse {
    /// Envelope
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// The channel
    #[serde(default)]
    pub channel: Channel,
}

/// Response from channels.list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelListResponse {
    /// Envelope
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// Channels visible to the caller
    #[serde(default)]
    pub channels: Vec<Channel>,
}

impl_api_response!(ChannelResponse, ChannelListResponse);
