//! Conversation memory for the relay.
//!
//! This module provides:
//! - [`ConversationBuffer`] - the bounded, ordered turns of one user
//! - [`trim_history`] - the cap enforcement applied after every append
//! - [`ConversationStore`] - the process-wide map from user id to buffer
//! - [`assemble_user_turn`] - turn construction from raw platform text
//!
//! Nothing here is persisted; history lives exactly as long as the process
//! (or until an idle sweep drops it).

mod buffer;
mod store;

pub use buffer::{ConversationBuffer, EvictionPolicy, trim_history};
pub use store::{ConversationStore, StoreSettings};

use crate::types::ConversationTurn;

/// Default number of turns kept per user.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Builds the user turn sent to the completion API and kept in history.
///
/// Every instruction suffix is concatenated onto the raw text, in order and
/// without separators. Only the augmented text is stored.
///
/// # Example
/// ```ignore
/// let turn = assemble_user_turn("hello", &["Answer briefly.".to_string()]);
/// assert_eq!(turn.content, "helloAnswer briefly.");
/// ```
pub fn assemble_user_turn(text: &str, suffixes: &[String]) -> ConversationTurn {
    let capacity = text.len() + suffixes.iter().map(String::len).sum::<usize>();
    let mut content = String::with_capacity(capacity);
    content.push_str(text);
    for suffix in suffixes {
        content.push_str(suffix);
    }
    ConversationTurn::user(content)
}
