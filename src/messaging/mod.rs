//! Outbound messaging platform
//!
//! The relay only ever answers an inbound event, so the platform surface is a
//! single reply call keyed by the event's reply token.

/// LINE Messaging API reply client.
pub mod line;

pub use line::LineClient;

use crate::types::Result;
use async_trait::async_trait;

/// Sends a text reply for an inbound event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Reply to the event identified by `reply_token`. Reply tokens are
    /// single use.
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()>;
}
