//! Event relay
//!
//! Turns verified webhook events into replies:
//!
//! - **follow** - replies with the configured welcome message; the
//!   conversation store is not touched
//! - **text message** - assembles the user turn, asks the completion API for
//!   a reply to the trimmed history, records the exchange and replies
//! - **anything else** - ignored, no reply and no store mutation
//!
//! # Failure handling
//!
//! The user turn is only stored together with the assistant turn answering
//! it. When the completion call fails the buffer is left exactly as it was
//! before the request and the error propagates to the HTTP layer.

use crate::llm::LLMClient;
use crate::memory::{assemble_user_turn, ConversationStore};
use crate::messaging::MessagingClient;
use crate::types::{
    ConversationTurn, FollowEvent, MessageEvent, Result, WebhookEvent, WebhookPayload,
};
use crate::utils::toml_config::RelayConfigManager;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What happened to a single webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// A reply was sent through the messaging platform.
    Replied,
    /// The event carried nothing to answer.
    Ignored,
}

/// Orchestrates the store, the completion client and the messaging client.
pub struct ChatRelay {
    store: Arc<ConversationStore>,
    llm: Arc<dyn LLMClient>,
    messenger: Arc<dyn MessagingClient>,
    config: Arc<RelayConfigManager>,
}

impl ChatRelay {
    pub fn new(
        store: Arc<ConversationStore>,
        llm: Arc<dyn LLMClient>,
        messenger: Arc<dyn MessagingClient>,
        config: Arc<RelayConfigManager>,
    ) -> Self {
        Self {
            store,
            llm,
            messenger,
            config,
        }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Handles every event of a payload in order, stopping at the first
    /// failure.
    pub async fn handle_payload(&self, payload: &WebhookPayload) -> Result<Vec<EventOutcome>> {
        let mut outcomes = Vec::with_capacity(payload.events.len());
        for event in &payload.events {
            outcomes.push(self.handle_event(event).await?);
        }
        Ok(outcomes)
    }

    pub async fn handle_event(&self, event: &WebhookEvent) -> Result<EventOutcome> {
        debug!(kind = event.kind(), "Dispatching webhook event");
        match event {
            WebhookEvent::Follow(follow) => self.handle_follow(follow).await,
            WebhookEvent::Message(message) => self.handle_message(message).await,
            WebhookEvent::Unsupported => {
                debug!("Ignoring unsupported webhook event");
                Ok(EventOutcome::Ignored)
            }
        }
    }

    async fn handle_follow(&self, event: &FollowEvent) -> Result<EventOutcome> {
        let Some(reply_token) = event.reply_token.as_deref() else {
            debug!("Follow event without reply token");
            return Ok(EventOutcome::Ignored);
        };

        let welcome = self.config.config().persona.welcome_message.clone();
        self.messenger
            .reply(reply_token, &welcome)
            .await
            .inspect_err(|e| error!("Failed to send welcome message: {}", e))?;
        info!("Sent welcome message to new follower");
        Ok(EventOutcome::Replied)
    }

    async fn handle_message(&self, event: &MessageEvent) -> Result<EventOutcome> {
        let Some(text) = event.text() else {
            debug!("Ignoring non-text message");
            return Ok(EventOutcome::Ignored);
        };
        let (Some(reply_token), Some(user_id)) = (event.reply_token.as_deref(), event.user_id())
        else {
            debug!("Ignoring message without reply token or user id");
            return Ok(EventOutcome::Ignored);
        };

        let reply = self.exchange(user_id, text).await?;
        self.messenger
            .reply(reply_token, &reply)
            .await
            .inspect_err(|e| error!(user_id, "Failed to deliver reply: {}", e))?;
        Ok(EventOutcome::Replied)
    }

    /// Runs one user message through the completion API and records the
    /// exchange. Returns the assistant's reply.
    pub async fn exchange(&self, user_id: &str, text: &str) -> Result<String> {
        let config = self.config.config();
        let user_turn = assemble_user_turn(text, &config.persona.instruction_suffixes);
        let history = self.store.preview_with(user_id, &user_turn);

        debug!(
            user_id,
            turns = history.len(),
            model = self.llm.model_name(),
            "Forwarding conversation to completion API"
        );

        let reply = match self.llm.generate_with_history(&history).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(user_id, "Completion failed, exchange discarded: {}", e);
                return Err(e);
            }
        };

        self.store
            .commit_exchange(user_id, user_turn, ConversationTurn::assistant(reply.clone()));
        Ok(reply)
    }
}
