//! Groups service for Slack API.
//!
//! Private groups: create, invite and list.

use crate::client::dispatch::{require, Dispatcher};
use crate::errors::SlackResult;
use crate::services::channels::list_params;
use crate::types::{impl_api_response, ChannelId, Group, ResponseEnvelope, UserId};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

/// Response from groups.create and groups.invite
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupResponse {
    /// Envelope
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// The group
    #[serde(default)]
    pub group: Group,
}

/// Response from groups.list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupListResponse {
    /// Envelope
    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
    /// Groups the caller belongs to
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl_api_response!(GroupResponse, GroupListResponse);

/// Trait for groups service operations
#[async_trait]
pub trait GroupsServiceTrait: Send + Sync {
    /// Create a private group
    async fn create(&self, name: &str) -> SlackResult<GroupResponse>;

    /// Invite a user to a group
    async fn invite(&self, channel: &ChannelId, user: &UserId) -> SlackResult<GroupResponse>;

    /// List groups
    async fn list(&self, exclude_archived: bool) -> SlackResult<GroupListResponse>;
}

/// Groups service implementation
#[derive(Clone, Debug)]
pub struct GroupsService {
    dispatcher: Dispatcher,
}

impl GroupsService {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl GroupsServiceTrait for GroupsService {
    #[instrument(skip(self))]
    async fn create(&self, name: &str) -> SlackResult<GroupResponse> {
        require("name", name)?;
        let params = vec![("name".to_string(), name.to_string())];
        self.dispatcher.call("groups.create", params).await
    }

    #[instrument(skip(self), fields(channel = %channel, user = %user))]
    async fn invite(&self, channel: &ChannelId, user: &UserId) -> SlackResult<GroupResponse> {
        require("channel", channel.as_str())?;
        require("user", user.as_str())?;
        let params = vec![
            ("channel".to_string(), channel.to_string()),
            ("user".to_string(), user.to_string()),
        ];
        self.dispatcher.call("groups.invite", params).await
    }

    #[instrument(skip(self))]
    async fn list(&self, exclude_archived: bool) -> SlackResult<GroupListResponse> {
        self.dispatcher
            .call("groups.list", list_params(exclude_archived))
            .await
    }
}
