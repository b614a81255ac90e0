//! Raw table rows and their conversion into domain entities.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use campus_core::{Actor, ActorKind};
use campus_entity::{Conversation, Message};

/// Column list matching [`ConversationRow`].
pub(crate) const CONVERSATION_COLUMNS: &str =
    "id, a_kind, a_id, b_kind, b_id, created_at, last_message_at";

/// Column list matching [`MessageRow`].
pub(crate) const MESSAGE_COLUMNS: &str =
    "id, conversation_id, sender_kind, sender_id, content, sent_at, is_read, read_at";

/// A row of the `conversations` table.
#[derive(Debug, FromRow)]
pub struct ConversationRow {
    pub id: i64,
    pub a_kind: ActorKind,
    pub a_id: i64,
    pub b_kind: ActorKind,
    pub b_id: i64,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Self {
            id: row.id,
            participant_a: Actor::new(row.a_id, row.a_kind),
            participant_b: Actor::new(row.b_id, row.b_kind),
            created_at: row.created_at,
            last_message_at: row.last_message_at,
        }
    }
}

/// A row of the `messages` table.
#[derive(Debug, FromRow)]
pub struct MessageRow {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_kind: ActorKind,
    pub sender_id: i64,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            conversation_id: row.conversation_id,
            sender: Actor::new(row.sender_id, row.sender_kind),
            content: row.content,
            timestamp: row.sent_at,
            is_read: row.is_read,
            read_at: row.read_at,
        }
    }
}
