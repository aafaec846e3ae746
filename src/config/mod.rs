//! Configuration management for the Slack client.
//!
//! Supports configuration via:
//! - Explicit values
//! - Environment variables
//! - Builder pattern
//!
//! A [`SlackConfig`] is owned by the client that was built from it; nothing
//! here is process-global.

use crate::errors::{ConfigurationError, SlackError, SlackResult};
use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Token type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Bot token (xoxb-*)
    Bot,
    /// User token (xoxp-*)
    User,
    /// App-level token (xapp-*)
    App,
    /// Workspace app token (xoxa-*)
    Workspace,
}

impl TokenType {
    /// Detect token type from prefix
    pub fn from_token(token: &str) -> Result<Self, ConfigurationError> {
        if token.starts_with("xoxb-") {
            Ok(TokenType::Bot)
        } else if token.starts_with("xoxp-") {
            Ok(TokenType::User)
        } else if token.starts_with("xapp-") {
            Ok(TokenType::App)
        } else if token.starts_with("xoxa-") {
            Ok(TokenType::Workspace)
        } else {
            Err(ConfigurationError::InvalidToken(
                "Token must start with xoxb-, xoxp-, xapp- or xoxa-".to_string(),
            ))
        }
    }
}

/// Secure wrapper for Slack tokens
#[derive(Clone)]
pub struct SlackToken {
    token: SecretString,
    token_type: TokenType,
}

impl SlackToken {
    /// Create a new token
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigurationError> {
        let token_str = token.into();
        let token_type = TokenType::from_token(&token_str)?;
        Ok(Self {
            token: SecretString::new(token_str),
            token_type,
        })
    }

    /// Get the token type
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Expose the token for use in requests
    pub(crate) fn expose(&self) -> &str {
        self.token.expose_secret()
    }
}

impl std::fmt::Debug for SlackToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SlackToken({:?}, [REDACTED])", self.token_type)
    }
}

/// Configuration for the Slack client
#[derive(Clone)]
pub struct SlackConfig {
    /// Token sent as the `token` field of every call
    pub(crate) token: Option<SlackToken>,
    /// Base URL for API requests
    pub base_url: Url,
    /// Request timeout for ordinary calls
    pub timeout: Duration,
    /// Request timeout for uploads; `None` lets an upload run as long as the
    /// source keeps producing bytes
    pub upload_timeout: Option<Duration>,
    /// Default headers
    pub default_headers: HeaderMap,
    /// Emit start/end/dump trace events for every request
    pub trace_requests: bool,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("token", &self.token.as_ref().map(|t| t.token_type))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("upload_timeout", &self.upload_timeout)
            .field("trace_requests", &self.trace_requests)
            .finish()
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_base_url(),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS),
            upload_timeout: None,
            default_headers: HeaderMap::new(),
            trace_requests: false,
        }
    }
}

fn default_base_url() -> Url {
    match Url::parse(crate::DEFAULT_BASE_URL) {
        Ok(url) => url,
        Err(e) => unreachable!("DEFAULT_BASE_URL is a valid URL: {e}"),
    }
}

impl SlackConfig {
    /// Create a new configuration builder
    pub fn builder() -> SlackConfigBuilder {
        SlackConfigBuilder::new()
    }

    /// Create configuration from environment variables
    ///
    /// Reads `SLACK_TOKEN`, `SLACK_BASE_URL`, `SLACK_TIMEOUT` and
    /// `SLACK_UPLOAD_TIMEOUT` (seconds) and `SLACK_TRACE` (`1`/`true`).
    pub fn from_env() -> SlackResult<Self> {
        let mut builder = SlackConfigBuilder::new();

        if let Ok(token) = std::env::var("SLACK_TOKEN") {
            builder = builder.token(&token)?;
        }

        if let Ok(url) = std::env::var("SLACK_BASE_URL") {
            builder = builder.base_url(&url)?;
        }

        if let Ok(timeout) = std::env::var("SLACK_TIMEOUT") {
            if let Ok(secs) = timeout.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(secs));
            }
        }

        if let Ok(timeout) = std::env::var("SLACK_UPLOAD_TIMEOUT") {
            if let Ok(secs) = timeout.parse::<u64>() {
                builder = builder.upload_timeout(Duration::from_secs(secs));
            }
        }

        if let Ok(trace) = std::env::var("SLACK_TRACE") {
            builder = builder.trace_requests(matches!(trace.as_str(), "1" | "true"));
        }

        builder.build()
    }

    /// Get the token if available
    pub fn token(&self) -> Option<&SlackToken> {
        self.token.as_ref()
    }

    /// Build the full URL for an API method
    pub fn build_url(&self, endpoint: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> SlackResult<()> {
        if self.token.is_none() {
            return Err(SlackError::Configuration(ConfigurationError::MissingToken));
        }
        if self.timeout.is_zero() {
            return Err(SlackError::Configuration(
                ConfigurationError::InvalidConfiguration {
                    message: "timeout must be greater than zero".to_string(),
                },
            ));
        }
        if self.upload_timeout.is_some_and(|t| t.is_zero()) {
            return Err(SlackError::Configuration(
                ConfigurationError::InvalidConfiguration {
                    message: "upload timeout must be greater than zero".to_string(),
                },
            ));
        }
        Ok(())
    }
}

/// Builder for SlackConfig
#[derive(Default)]
pub struct SlackConfigBuilder {
    config: SlackConfig,
}

impl SlackConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: SlackConfig::default(),
        }
    }

    /// Set the API token
    pub fn token(mut self, token: &str) -> Result<Self, ConfigurationError> {
        self.config.token = Some(SlackToken::new(token)?);
        Ok(self)
    }

    /// Set the base URL
    pub fn base_url(mut self, url: &str) -> Result<Self, ConfigurationError> {
        self.config.base_url =
            Url::parse(url).map_err(|e| ConfigurationError::InvalidConfiguration {
                message: format!("Invalid URL: {}", e),
            })?;
        Ok(self)
    }

    /// Set the timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the timeout applied to uploads
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.config.upload_timeout = Some(timeout);
        self
    }

    /// Add a default header
    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        if let Ok(header_name) = name.parse::<http::header::HeaderName>() {
            if let Ok(header_value) = value.parse::<http::header::HeaderValue>() {
                self.config.default_headers.insert(header_name, header_value);
            }
        }
        self
    }

    /// Enable or disable request tracing
    pub fn trace_requests(mut self, enabled: bool) -> Self {
        self.config.trace_requests = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SlackResult<SlackConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build the configuration without validation (for testing)
    pub fn build_unchecked(self) -> SlackConfig {
        self.config
    }
}
