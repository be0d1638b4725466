//! Mock implementations for testing.
//!
//! This module provides mock completion and messaging clients plus webhook
//! payload builders that can be shared across test files.

#![allow(dead_code)]

use iris::auth::signature::SignatureVerifier;
use iris::llm::LLMClient;
use iris::messaging::MessagingClient;
use iris::types::{AppError, ConversationTurn, Result};
use iris::{AppState, RelayConfig, RelayConfigManager};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

pub const CHANNEL_SECRET: &str = "test-channel-secret";

/// Mock completion client with a fixed response.
///
/// Every history it receives is recorded so tests can assert on exactly
/// what would have been sent upstream.
pub struct MockLLMClient {
    response: String,
    should_fail: bool,
    calls: Mutex<Vec<Vec<ConversationTurn>>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: response.to_string(),
            should_fail: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: String::new(),
            should_fail: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Vec<ConversationTurn>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_with_history(&self, messages: &[ConversationTurn]) -> Result<String> {
        self.calls.lock().push(messages.to_vec());
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Messaging client that records `(reply_token, text)` pairs.
#[derive(Default)]
pub struct RecordingMessenger {
    replies: Mutex<Vec<(String, String)>>,
    should_fail: bool,
}

impl RecordingMessenger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(Vec::new()),
            should_fail: true,
        })
    }

    pub fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().clone()
    }
}

#[async_trait]
impl MessagingClient for RecordingMessenger {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        if self.should_fail {
            return Err(AppError::Messaging("Mock reply failure".to_string()));
        }
        self.replies
            .lock()
            .push((reply_token.to_string(), text.to_string()));
        Ok(())
    }
}

/// Configuration with short, predictable persona strings.
pub fn test_config() -> RelayConfig {
    let mut config = RelayConfig::default();
    config.conversation.max_turns = 4;
    config.persona.system_prompt = "You are Iris.".to_string();
    config.persona.welcome_message = "Thanks for adding me!".to_string();
    config.persona.instruction_suffixes = vec![" Keep it short.".to_string()];
    config
}

pub fn test_state(
    config: RelayConfig,
    llm: Arc<MockLLMClient>,
    messenger: Arc<RecordingMessenger>,
) -> AppState {
    AppState::with_clients(
        Arc::new(RelayConfigManager::from_config(config)),
        llm,
        messenger,
        CHANNEL_SECRET,
    )
}

/// Signature the messaging platform would attach to `body`.
pub fn sign(body: &[u8]) -> String {
    SignatureVerifier::new(CHANNEL_SECRET).sign(body)
}

pub fn text_event(user_id: &str, reply_token: &str, text: &str) -> Value {
    json!({
        "type": "message",
        "mode": "active",
        "timestamp": 1700000000000u64,
        "replyToken": reply_token,
        "source": {"type": "user", "userId": user_id},
        "message": {"type": "text", "id": "100001", "text": text}
    })
}

pub fn sticker_event(user_id: &str, reply_token: &str) -> Value {
    json!({
        "type": "message",
        "mode": "active",
        "timestamp": 1700000000000u64,
        "replyToken": reply_token,
        "source": {"type": "user", "userId": user_id},
        "message": {"type": "sticker", "id": "100002", "packageId": "446", "stickerId": "1988"}
    })
}

pub fn follow_event(user_id: &str, reply_token: &str) -> Value {
    json!({
        "type": "follow",
        "mode": "active",
        "timestamp": 1700000000000u64,
        "replyToken": reply_token,
        "source": {"type": "user", "userId": user_id}
    })
}

pub fn unfollow_event(user_id: &str) -> Value {
    json!({
        "type": "unfollow",
        "mode": "active",
        "timestamp": 1700000000000u64,
        "source": {"type": "user", "userId": user_id}
    })
}

/// Serialized webhook body wrapping `events`.
pub fn payload(events: Vec<Value>) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "destination": "U0000000000000000000000000000000",
        "events": events
    }))
    .expect("payload serializes")
}
