//! Message entity model.

use campus_core::Actor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message persisted into a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier, increasing within a conversation.
    pub id: i64,
    /// Owning conversation.
    pub conversation_id: i64,
    /// Who sent it.
    pub sender: Actor,
    /// Message body.
    pub content: String,
    /// Store-assigned send time, increasing within a conversation.
    pub timestamp: DateTime<Utc>,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When it was read.
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Check whether the message counts as unread for `actor`.
    pub fn is_unread_for(&self, actor: &Actor) -> bool {
        !self.is_read && self.sender != *actor
    }
}

/// Outcome of a mark-as-read call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadReceipt {
    /// Conversation whose messages were marked.
    pub conversation_id: i64,
    /// The actor who read them.
    pub reader: Actor,
    /// Number of messages that flipped to read.
    pub updated_count: u64,
}
