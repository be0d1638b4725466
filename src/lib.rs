//! # Iris Relay
//!
//! A webhook relay between the LINE Messaging API and an OpenAI-compatible
//! chat-completion API. It keeps a short rolling conversation history per
//! user, forwards that history to the completion API and replies with the
//! result.
//!
//! ## Overview
//!
//! The relay can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `iris-relay` binary
//! 2. **As a library** - Build an [`AppState`] and mount [`api::routes::create_router`]
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use iris::{AppState, RelayConfigManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config_manager = Arc::new(RelayConfigManager::new("iris.toml")?);
//!     let secrets = config_manager.config().secrets();
//!     let state = AppState::new(config_manager, &secrets)?;
//!
//!     let app = iris::api::routes::create_router(state);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Webhook and health routes
//! - [`auth`] - Webhook signature verification
//! - [`llm`] - Completion client
//! - [`memory`] - Conversation buffers, trimming and the per-user store
//! - [`messaging`] - Messaging platform reply client
//! - [`relay`] - Event dispatch and the exchange flow
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration loading and hot reload

#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Webhook signature verification.
pub mod auth;
/// CLI argument parsing and terminal output.
pub mod cli;
/// Completion client abstractions.
pub mod llm;
/// Conversation memory.
pub mod memory;
/// Messaging platform client.
pub mod messaging;
/// Event dispatch.
pub mod relay;
/// Core types (turns, webhook events, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::{LLMClient, OpenAIClient};
pub use memory::{ConversationStore, EvictionPolicy};
pub use messaging::{LineClient, MessagingClient};
pub use relay::{ChatRelay, EventOutcome};
pub use types::{AppError, Result};
pub use utils::toml_config::{RelayConfig, RelayConfigManager, Secrets};

use crate::auth::signature::SignatureVerifier;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML-based configuration with hot-reload support
    pub config_manager: Arc<RelayConfigManager>,
    /// Per-user conversation history
    pub store: Arc<ConversationStore>,
    /// Event dispatcher
    pub relay: Arc<ChatRelay>,
    /// Webhook signature verifier
    pub verifier: Arc<SignatureVerifier>,
    /// Process start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build the state with real HTTP clients for the configured endpoints.
    pub fn new(config_manager: Arc<RelayConfigManager>, secrets: &Secrets) -> Result<Self> {
        let config = config_manager.config();

        let llm = OpenAIClient::with_params(
            secrets.llm_api_key.clone(),
            config.llm.api_base.clone(),
            config.llm.model.clone(),
            config.llm.params(),
            config.llm.timeout(),
        )?;
        let messenger = LineClient::new(
            secrets.channel_access_token.clone(),
            config.line.api_base.clone(),
        );

        Ok(Self::with_clients(
            config_manager,
            Arc::new(llm),
            Arc::new(messenger),
            &secrets.channel_secret,
        ))
    }

    /// Build the state around caller-supplied clients.
    pub fn with_clients(
        config_manager: Arc<RelayConfigManager>,
        llm: Arc<dyn LLMClient>,
        messenger: Arc<dyn MessagingClient>,
        channel_secret: &str,
    ) -> Self {
        let store = Arc::new(ConversationStore::new(
            config_manager.config().store_settings(),
        ));
        let relay = Arc::new(ChatRelay::new(
            Arc::clone(&store),
            llm,
            messenger,
            Arc::clone(&config_manager),
        ));

        Self {
            config_manager,
            store,
            relay,
            verifier: Arc::new(SignatureVerifier::new(channel_secret)),
            started_at: Utc::now(),
        }
    }
}
