//! Slack client implementation.
//!
//! Provides the main entry point for interacting with Slack APIs.

pub mod dispatch;

pub use dispatch::{append_not_empty, Params};

use crate::auth::AuthManager;
use crate::config::SlackConfig;
use crate::errors::SlackResult;
use crate::services::{
    ChannelsService, ChannelsServiceTrait, FilesService, FilesServiceTrait, GroupsService,
    GroupsServiceTrait,
};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::SlackApiResponse;
use dispatch::Dispatcher;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Trait defining the Slack client interface
pub trait SlackClient: Send + Sync {
    /// Get the configuration
    fn config(&self) -> &SlackConfig;

    /// Get the authentication manager
    fn auth_manager(&self) -> &AuthManager;

    /// Get the channels service
    fn channels(&self) -> &dyn ChannelsServiceTrait;

    /// Get the groups service
    fn groups(&self) -> &dyn GroupsServiceTrait;

    /// Get the files service
    fn files(&self) -> &dyn FilesServiceTrait;
}

/// Main Slack client implementation
#[derive(Clone)]
pub struct SlackClientImpl {
    config: Arc<SlackConfig>,
    auth: AuthManager,
    transport: Arc<dyn HttpTransport>,
    dispatcher: Dispatcher,
    channels_service: ChannelsService,
    groups_service: GroupsService,
    files_service: FilesService,
}

impl SlackClientImpl {
    /// Create a new Slack client with the given configuration
    pub fn new(config: SlackConfig) -> SlackResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Self::with_transport(config, transport)
    }

    /// Create a new Slack client with a custom transport
    pub fn with_transport(
        config: SlackConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> SlackResult<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let auth = AuthManager::new(config.clone());
        let dispatcher = Dispatcher::new(config.clone(), auth.clone(), transport.clone());

        Ok(Self {
            channels_service: ChannelsService::new(dispatcher.clone()),
            groups_service: GroupsService::new(dispatcher.clone()),
            files_service: FilesService::new(dispatcher.clone()),
            config,
            auth,
            transport,
            dispatcher,
        })
    }

    /// Get a reference to the HTTP transport
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    /// Get a reference to the base URL
    pub fn base_url(&self) -> &str {
        self.config.base_url.as_str()
    }

    /// Build a full URL for an endpoint
    pub fn build_url(&self, endpoint: &str) -> String {
        self.config.build_url(endpoint)
    }

    /// Call any Web API method not covered by a service
    ///
    /// The token is added to `params`, the answer is decoded into `T` and an
    /// `ok: false` envelope comes back as a service error.
    pub async fn call<T>(&self, method: &str, params: Params) -> SlackResult<T>
    where
        T: DeserializeOwned + SlackApiResponse,
    {
        self.dispatcher.call(method, params).await
    }

    /// Get the channels service
    pub fn channels(&self) -> &ChannelsService {
        &self.channels_service
    }

    /// Get the groups service
    pub fn groups(&self) -> &GroupsService {
        &self.groups_service
    }

    /// Get the files service
    pub fn files(&self) -> &FilesService {
        &self.files_service
    }
}

impl SlackClient for SlackClientImpl {
    fn config(&self) -> &SlackConfig {
        &self.config
    }

    fn auth_manager(&self) -> &AuthManager {
        &self.auth
    }

    fn channels(&self) -> &dyn ChannelsServiceTrait {
        &self.channels_service
    }

    fn groups(&self) -> &dyn GroupsServiceTrait {
        &self.groups_service
    }

    fn files(&self) -> &dyn FilesServiceTrait {
        &self.files_service
    }
}

impl std::fmt::Debug for SlackClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClientImpl")
            .field("config", &self.config)
            .field("auth", &self.auth)
            .finish()
    }
}
