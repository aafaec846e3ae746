//! Channels service implementation.

use super::*;
use crate::client::dispatch::{require, Dispatcher, Params};
use crate::errors::SlackResult;
use crate::types::{ChannelId, ResponseEnvelope, Timestamp};
use async_trait::async_trait;
use tracing::instrument;

/// Trait for channels service operations
#[async_trait]
pub trait ChannelsServiceTrait: Send + Sync {
    /// Archive a channel
    async fn archive(&self, channel: &ChannelId) -> SlackResult<ResponseEnvelope>;

    /// Create a channel
    async fn create(&self, name: &str) -> SlackResult<ChannelResponse>;

    /// Get channel info
    async fn info(&self, channel: &ChannelId) -> SlackResult<ChannelResponse>;

    /// List channels, optionally leaving out archived ones
    async fn list(&self, exclude_archived: bool) -> SlackResult<ChannelListResponse>;

    /// Move the read cursor of a channel, group or IM to `ts`
    ///
    /// The method is picked from the id prefix: `G…` goes to `groups.mark`,
    /// `D…` to `im.mark` and everything else to `channels.mark`.
    async fn mark(&self, channel: &ChannelId, ts: &Timestamp) -> SlackResult<ResponseEnvelope>;
}

/// Channels service implementation
#[derive(Clone, Debug)]
pub struct ChannelsService {
    dispatcher: Dispatcher,
}

impl ChannelsService {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

fn channel_params(channel: &ChannelId) -> SlackResult<Params> {
    require("channel", channel.as_str())?;
    Ok(vec![("channel".to_string(), channel.to_string())])
}

/// Parameters shared by every `*.list` call
pub(crate) fn list_params(exclude_archived: bool) -> Params {
    if exclude_archived {
        vec![("exclude_archived".to_string(), "1".to_string())]
    } else {
        Params::new()
    }
}

#[async_trait]
impl ChannelsServiceTrait for ChannelsService {
    #[instrument(skip(self), fields(channel = %channel))]
    async fn archive(&self, channel: &ChannelId) -> SlackResult<ResponseEnvelope> {
        let params = channel_params(channel)?;
        self.dispatcher.call("channels.archive", params).await
    }

    #[instrument(skip(self))]
    async fn create(&self, name: &str) -> SlackResult<ChannelResponse> {
        require("name", name)?;
        let params = vec![("name".to_string(), name.to_string())];
        self.dispatcher.call("channels.create", params).await
    }

    #[instrument(skip(self), fields(channel = %channel))]
    async fn info(&self, channel: &ChannelId) -> SlackResult<ChannelResponse> {
        let params = channel_params(channel)?;
        self.dispatcher.call("channels.info", params).await
    }

    #[instrument(skip(self))]
    async fn list(&self, exclude_archived: bool) -> SlackResult<ChannelListResponse> {
        self.dispatcher
            .call("channels.list", list_params(exclude_archived))
            .await
    }

    #[instrument(skip(self), fields(channel = %channel, ts = %ts))]
    async fn mark(&self, channel: &ChannelId, ts: &Timestamp) -> SlackResult<ResponseEnvelope> {
        let mut params = channel_params(channel)?;
        params.push(("ts".to_string(), ts.to_string()));
        let method = format!("{}.mark", channel.kind().api_prefix());
        self.dispatcher.call(&method, params).await
    }
}
