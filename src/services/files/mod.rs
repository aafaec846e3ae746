//! Files service for Slack API.
//!
//! Uploads stream their content through [`crate::upload`]; everything else
//! is an ordinary form call.

mod requests;
mod responses;
mod service;

pub use requests::*;
pub use responses::*;
pub use service::*;
