use super::buffer::{ConversationBuffer, EvictionPolicy};
use crate::types::ConversationTurn;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Seed and cap applied to every buffer in a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Persona turn placed at the front of every new buffer.
    pub seed: ConversationTurn,
    pub max_turns: usize,
    pub eviction: EvictionPolicy,
}

#[derive(Debug)]
struct ConversationEntry {
    buffer: ConversationBuffer,
    last_active: Instant,
}

impl ConversationEntry {
    fn seeded(seed: &ConversationTurn) -> Self {
        Self {
            buffer: ConversationBuffer::seeded(seed.clone()),
            last_active: Instant::now(),
        }
    }
}

/// In-process map from user id to that user's conversation buffer.
///
/// Shared by handle across request handlers. The map lock is held only for
/// in-memory bookkeeping and never across an `.await`.
pub struct ConversationStore {
    conversations: Mutex<HashMap<String, ConversationEntry>>,
    settings: ArcSwap<StoreSettings>,
}

impl ConversationStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            conversations: Mutex::new(HashMap::new()),
            settings: ArcSwap::from_pointee(settings),
        }
    }

    /// Current settings (lockless read).
    pub fn settings(&self) -> Arc<StoreSettings> {
        self.settings.load_full()
    }

    /// Replaces seed and cap. Existing buffers pick up a smaller cap on their
    /// next append.
    pub fn set_settings(&self, settings: StoreSettings) {
        self.settings.store(Arc::new(settings));
    }

    /// Returns the user's buffer, creating a seeded one on first contact.
    pub fn get_or_create(&self, user_id: &str) -> ConversationBuffer {
        let settings = self.settings.load();
        let mut conversations = self.conversations.lock();
        let entry = Self::entry(&mut conversations, user_id, &settings.seed);
        entry.last_active = Instant::now();
        entry.buffer.clone()
    }

    /// Returns the user's buffer if one exists.
    pub fn get(&self, user_id: &str) -> Option<ConversationBuffer> {
        self.conversations
            .lock()
            .get(user_id)
            .map(|entry| entry.buffer.clone())
    }

    /// Appends a turn to the user's buffer and trims it.
    pub fn append(&self, user_id: &str, turn: ConversationTurn) {
        let settings = self.settings.load();
        let mut conversations = self.conversations.lock();
        let entry = Self::entry(&mut conversations, user_id, &settings.seed);
        let evicted = entry
            .buffer
            .push(turn, settings.max_turns, settings.eviction);
        entry.last_active = Instant::now();
        if evicted > 0 {
            debug!(user_id, evicted, "Trimmed conversation history");
        }
    }

    /// History that would result from appending `turn`, without storing it.
    ///
    /// Creates the seeded buffer on first contact.
    pub fn preview_with(&self, user_id: &str, turn: &ConversationTurn) -> Vec<ConversationTurn> {
        let mut buffer = self.get_or_create(user_id);
        let settings = self.settings.load();
        buffer.push(turn.clone(), settings.max_turns, settings.eviction);
        buffer.to_vec()
    }

    /// Appends a user turn and the assistant turn answering it under a single
    /// lock acquisition, trimming after each.
    pub fn commit_exchange(
        &self,
        user_id: &str,
        user_turn: ConversationTurn,
        assistant_turn: ConversationTurn,
    ) {
        let settings = self.settings.load();
        let mut conversations = self.conversations.lock();
        let entry = Self::entry(&mut conversations, user_id, &settings.seed);
        let evicted = entry
            .buffer
            .push(user_turn, settings.max_turns, settings.eviction)
            + entry
                .buffer
                .push(assistant_turn, settings.max_turns, settings.eviction);
        entry.last_active = Instant::now();
        debug!(
            user_id,
            evicted,
            len = entry.buffer.len(),
            "Committed conversation exchange"
        );
    }

    pub fn len(&self) -> usize {
        self.conversations.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.lock().is_empty()
    }

    /// Drops every conversation idle for longer than `ttl`. Returns the
    /// number removed.
    pub fn prune_idle(&self, ttl: Duration) -> usize {
        match Instant::now().checked_sub(ttl) {
            Some(cutoff) => self.prune_inactive_since(cutoff),
            None => 0,
        }
    }

    fn prune_inactive_since(&self, cutoff: Instant) -> usize {
        let mut conversations = self.conversations.lock();
        let before = conversations.len();
        conversations.retain(|_, entry| entry.last_active >= cutoff);
        before - conversations.len()
    }

    /// Runs [`prune_idle`](Self::prune_idle) every `interval` until the
    /// returned handle is aborted.
    pub fn spawn_idle_sweeper(
        store: Arc<Self>,
        ttl: Duration,
        interval: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = store.prune_idle(ttl);
                if removed > 0 {
                    info!(removed, remaining = store.len(), "Pruned idle conversations");
                }
            }
        })
    }

    fn entry<'a>(
        conversations: &'a mut HashMap<String, ConversationEntry>,
        user_id: &str,
        seed: &ConversationTurn,
    ) -> &'a mut ConversationEntry {
        conversations
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!(user_id, "Seeding new conversation");
                ConversationEntry::seeded(seed)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(max_turns: usize, eviction: EvictionPolicy) -> StoreSettings {
        StoreSettings {
            seed: ConversationTurn::system("You are Iris."),
            max_turns,
            eviction,
        }
    }

    #[test]
    fn test_first_contact_seeds_persona() {
        let store = ConversationStore::new(settings(10, EvictionPolicy::Fifo));
        assert!(store.get("U1").is_none());

        let buffer = store.get_or_create("U1");
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.first(), Some(&ConversationTurn::system("You are Iris.")));
        assert!(buffer.has_seed());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let store = ConversationStore::new(settings(10, EvictionPolicy::Fifo));
        store.append("U1", ConversationTurn::user("hi"));

        let first = store.get_or_create("U1");
        let second = store.get_or_create("U1");
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_append_trims_to_cap() {
        let store = ConversationStore::new(settings(3, EvictionPolicy::Fifo));
        for text in ["A", "B", "C", "D"] {
            store.append("U1", ConversationTurn::user(text));
            assert!(store.get("U1").unwrap().len() <= 3);
        }
        let contents: Vec<_> = store
            .get("U1")
            .unwrap()
            .iter()
            .map(|t| t.content.clone())
            .collect();
        assert_eq!(contents, vec!["B", "C", "D"]);
    }

    #[test]
    fn test_users_are_isolated() {
        let store = ConversationStore::new(settings(10, EvictionPolicy::Fifo));
        store.append("U1", ConversationTurn::user("from one"));
        store.append("U2", ConversationTurn::user("from two"));

        assert_eq!(store.get("U1").unwrap().last().unwrap().content, "from one");
        assert_eq!(store.get("U2").unwrap().last().unwrap().content, "from two");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let store = ConversationStore::new(settings(2, EvictionPolicy::Fifo));
        let preview = store.preview_with("U1", &ConversationTurn::user("hello"));
        assert_eq!(
            preview,
            vec![
                ConversationTurn::system("You are Iris."),
                ConversationTurn::user("hello")
            ]
        );
        assert_eq!(store.get("U1").unwrap().len(), 1);
    }

    #[test]
    fn test_preview_always_ends_with_user_turn() {
        for eviction in [EvictionPolicy::Fifo, EvictionPolicy::PinSeed] {
            for max_turns in [0, 1] {
                let store = ConversationStore::new(settings(max_turns, eviction));
                let preview = store.preview_with("U1", &ConversationTurn::user("hello"));
                assert_eq!(preview, vec![ConversationTurn::user("hello")]);
            }
        }
    }

    #[test]
    fn test_preview_matches_append_result() {
        let store = ConversationStore::new(settings(3, EvictionPolicy::Fifo));
        store.commit_exchange(
            "U1",
            ConversationTurn::user("q1"),
            ConversationTurn::assistant("a1"),
        );
        let turn = ConversationTurn::user("q2");
        let preview = store.preview_with("U1", &turn);
        store.append("U1", turn);
        assert_eq!(preview, store.get("U1").unwrap().to_vec());
    }

    #[test]
    fn test_commit_exchange_appends_pair() {
        let store = ConversationStore::new(settings(10, EvictionPolicy::Fifo));
        store.commit_exchange(
            "U1",
            ConversationTurn::user("question"),
            ConversationTurn::assistant("answer"),
        );
        let turns = store.get("U1").unwrap().to_vec();
        assert_eq!(
            turns,
            vec![
                ConversationTurn::system("You are Iris."),
                ConversationTurn::user("question"),
                ConversationTurn::assistant("answer"),
            ]
        );
    }

    #[test]
    fn test_set_settings_applies_on_next_append() {
        let store = ConversationStore::new(settings(10, EvictionPolicy::Fifo));
        for i in 0..6 {
            store.append("U1", ConversationTurn::user(i.to_string()));
        }
        assert_eq!(store.get("U1").unwrap().len(), 7);

        store.set_settings(settings(3, EvictionPolicy::Fifo));
        assert_eq!(store.get("U1").unwrap().len(), 7);

        store.append("U1", ConversationTurn::user("6"));
        assert_eq!(store.get("U1").unwrap().len(), 3);
    }

    #[test]
    fn test_prune_inactive_since() {
        let store = ConversationStore::new(settings(10, EvictionPolicy::Fifo));
        store.get_or_create("stale");
        std::thread::sleep(Duration::from_millis(5));
        let cutoff = Instant::now();
        std::thread::sleep(Duration::from_millis(5));
        store.get_or_create("fresh");

        assert_eq!(store.prune_inactive_since(cutoff), 1);
        assert!(store.get("stale").is_none());
        assert!(store.get("fresh").is_some());
    }

    #[test]
    fn test_prune_idle_with_long_ttl_keeps_everything() {
        let store = ConversationStore::new(settings(10, EvictionPolicy::Fifo));
        store.get_or_create("U1");
        store.get_or_create("U2");
        assert_eq!(store.prune_idle(Duration::from_secs(3600)), 0);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_idle_sweeper_prunes_in_background() {
        let store = Arc::new(ConversationStore::new(settings(10, EvictionPolicy::Fifo)));
        store.get_or_create("U1");

        let handle = ConversationStore::spawn_idle_sweeper(
            Arc::clone(&store),
            Duration::from_millis(10),
            Duration::from_millis(10),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(store.is_empty());
    }
}
