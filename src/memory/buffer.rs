use crate::types::ConversationTurn;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What the trimmer removes once a buffer is over its cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Oldest turn first, persona seed included.
    #[default]
    Fifo,
    /// Oldest turn after the persona seed; the seed stays at the front.
    PinSeed,
}

/// Ordered turns for a single user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationBuffer {
    turns: VecDeque<ConversationTurn>,
    seed_present: bool,
}

impl ConversationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding only the persona turn.
    pub fn seeded(seed: ConversationTurn) -> Self {
        let mut turns = VecDeque::with_capacity(1);
        turns.push_back(seed);
        Self {
            turns,
            seed_present: true,
        }
    }

    /// Appends `turn` and trims down to `max_turns`. Returns how many turns
    /// were evicted.
    pub fn push(
        &mut self,
        turn: ConversationTurn,
        max_turns: usize,
        policy: EvictionPolicy,
    ) -> usize {
        self.turns.push_back(turn);
        trim_history(self, max_turns, policy)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether the persona turn seeded at creation is still the first turn.
    pub fn has_seed(&self) -> bool {
        self.seed_present
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    pub fn first(&self) -> Option<&ConversationTurn> {
        self.turns.front()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.back()
    }

    pub fn to_vec(&self) -> Vec<ConversationTurn> {
        self.turns.iter().cloned().collect()
    }
}

/// Removes turns until `buffer` holds at most `max_turns`.
///
/// The newest turn is never evicted, so a cap below 1 acts as 1. The seed is
/// only pinned when the cap leaves room for it next to the newest turn.
///
/// Returns the number of evicted turns.
pub fn trim_history(
    buffer: &mut ConversationBuffer,
    max_turns: usize,
    policy: EvictionPolicy,
) -> usize {
    let max_turns = max_turns.max(1);
    let pin_seed = policy == EvictionPolicy::PinSeed && max_turns >= 2;
    let mut evicted = 0;
    while buffer.turns.len() > max_turns {
        if pin_seed && buffer.seed_present {
            buffer.turns.remove(1);
        } else {
            buffer.turns.pop_front();
            buffer.seed_present = false;
        }
        evicted += 1;
    }
    evicted
}
