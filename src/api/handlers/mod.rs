//! API request handlers.

/// Health check handler.
pub mod health;
/// Webhook callback handler.
pub mod webhook;
