//! Authentication management for the Slack client.
//!
//! The Web API methods used here take the token as a `token` form field
//! rather than an `Authorization` header, so the manager injects it into the
//! parameter list of every call.

use crate::config::{SlackConfig, TokenType};
use crate::errors::{ConfigurationError, SlackError, SlackResult};
use http::HeaderMap;
use std::sync::Arc;

/// Form field carrying the token
pub const TOKEN_FIELD: &str = "token";

/// Authentication manager for Slack API requests
#[derive(Clone)]
pub struct AuthManager {
    config: Arc<SlackConfig>,
}

impl AuthManager {
    /// Create a new authentication manager
    pub fn new(config: Arc<SlackConfig>) -> Self {
        Self { config }
    }

    /// Append the `token` field to `params`, replacing any existing one
    pub fn append_token(&self, params: &mut Vec<(String, String)>) -> SlackResult<()> {
        let token = self
            .config
            .token()
            .ok_or(SlackError::Configuration(ConfigurationError::MissingToken))?;
        params.retain(|(key, _)| key != TOKEN_FIELD);
        params.push((TOKEN_FIELD.to_string(), token.expose().to_string()));
        Ok(())
    }

    /// Headers sent with every request
    pub fn default_headers(&self) -> HeaderMap {
        self.config.default_headers.clone()
    }

    /// Get the configured token type
    pub fn token_type(&self) -> Option<TokenType> {
        self.config.token().map(|t| t.token_type())
    }

    /// Check if a token is configured
    pub fn has_token(&self) -> bool {
        self.config.token().is_some()
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("token_type", &self.token_type())
            .finish()
    }
}
