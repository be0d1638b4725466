//! Completion client
//!
//! This module provides the interface the relay uses to turn a conversation
//! history into the next assistant message.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The trait the relay depends on
//! - [`OpenAIClient`] - OpenAI-compatible HTTP implementation
//! - [`ModelParams`] - Optional generation limits (max tokens, temperature)
//!
//! # Example
//!
//! ```ignore
//! use iris::llm::{LLMClient, OpenAIClient};
//! use iris::types::ConversationTurn;
//!
//! let client = OpenAIClient::new(api_key, "https://api.openai.com/v1".into(), "gpt-3.5-turbo".into())?;
//! let reply = client
//!     .generate_with_history(&[ConversationTurn::user("What is 2+2?")])
//!     .await?;
//! ```

/// Core LLM client trait and request parameters.
pub mod client;
/// OpenAI-compatible chat-completion client.
pub mod openai;

pub use client::{LLMClient, ModelParams};
pub use openai::OpenAIClient;
