use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::history::{history_view, HistoryEntry};
use crate::models::message::Message;

/// Greeting every new conversation starts with
pub const GREETING: &str = "Hello! I'm your CZTL Assistant. How can I help you today with our Ultra High Purity Methylene Blue?";

/// Append-only, in-memory transcript for a single session
///
/// Appends take the write lock for the whole push, so a snapshot never sees a
/// partially written message.
#[derive(Debug)]
pub struct ConversationStore {
    messages: RwLock<Vec<Message>>,
}

impl ConversationStore {
    /// Create a store seeded with a single model greeting
    pub fn seeded<S: Into<String>>(greeting: S) -> Self {
        Self {
            messages: RwLock::new(vec![Message::model(greeting)]),
        }
    }

    /// Add a message to the end of the transcript
    pub fn append(&self, message: Message) {
        self.write().push(message);
    }

    /// Point-in-time copy of the transcript
    pub fn snapshot(&self) -> Vec<Message> {
        self.read().clone()
    }

    /// The transcript as it stands now, minus system messages
    pub fn history_view(&self) -> Vec<HistoryEntry> {
        history_view(&self.read())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn last(&self) -> Option<Message> {
        self.read().last().cloned()
    }

    // A panic while holding the lock cannot leave the Vec half-pushed, so the
    // data behind a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Message>> {
        self.messages.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Message>> {
        self.messages.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::seeded(GREETING)
    }
}
