//! Completion client abstraction
//!
//! The relay talks to exactly one chat-completion service per process. The
//! [`LLMClient`] trait keeps that service swappable (and mockable in tests).

use crate::types::{ConversationTurn, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generic LLM client trait for provider abstraction
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate the next assistant message for an ordered conversation.
    ///
    /// Transport, quota and decoding failures all surface as
    /// [`AppError::LLM`](crate::types::AppError::LLM). No retries.
    async fn generate_with_history(&self, messages: &[ConversationTurn]) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Optional generation limits forwarded with every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ModelParams {
    pub fn is_empty(&self) -> bool {
        self.max_tokens.is_none() && self.temperature.is_none()
    }
}
