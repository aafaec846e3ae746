//! Slack Files Client
//!
//! Typed client for the channel, group and file methods of the Slack Web API:
//! - Channels: archive, create, info, list, mark (routed to groups/IMs by id)
//! - Groups: create, invite, list
//! - Files: streaming upload, list, info, comments
//!
//! Uploads never buffer the file. A background encoder writes the multipart
//! body into a bounded pipe that the HTTP transport reads as the request
//! body, see [`upload`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use slack_files_client::services::files::UploadFileRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = slack_files_client::create_client_from_env()?;
//!
//!     let report = tokio::fs::File::open("report.txt").await?;
//!     let request = UploadFileRequest::new("report.txt")
//!         .title("report")
//!         .channels(["C123"]);
//!     let response = client.files().upload_reader(request, report).await?;
//!
//!     println!("Uploaded {}", response.file.id);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod transport;
pub mod types;

// Services
pub mod services;

// Streaming upload pipeline
pub mod upload;

// Observability
pub mod observability;

// Testing utilities
pub mod fixtures;
pub mod mocks;

// Tests
#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use client::{SlackClient, SlackClientImpl};
pub use config::{SlackConfig, SlackConfigBuilder};
pub use errors::{SlackError, SlackResult};

/// Default base URL for Slack API
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api/";

/// Default timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Create a Slack client with the given configuration
pub fn create_client(config: SlackConfig) -> SlackResult<SlackClientImpl> {
    SlackClientImpl::new(config)
}

/// Create a Slack client from environment variables
///
/// Reads:
/// - `SLACK_TOKEN` - API token (xoxb-*, xoxp-*, xapp-* or xoxa-*)
/// - `SLACK_BASE_URL` - API root, defaults to [`DEFAULT_BASE_URL`]
/// - `SLACK_TIMEOUT` - timeout for ordinary calls, in seconds
/// - `SLACK_UPLOAD_TIMEOUT` - timeout for uploads, in seconds
/// - `SLACK_TRACE` - `1` or `true` to log every request and response
pub fn create_client_from_env() -> SlackResult<SlackClientImpl> {
    let config = SlackConfig::from_env()?;
    create_client(config)
}
