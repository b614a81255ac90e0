//! Conversation views composed for clients.

use serde::{Deserialize, Serialize};

use super::Conversation;
use crate::actor::ActorProfile;
use crate::message::Message;

/// One row of an actor's conversation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedConversation {
    /// The conversation record.
    #[serde(flatten)]
    pub conversation: Conversation,
    /// Display identity of the other side.
    pub peer: ActorProfile,
    /// Whether the peer currently has a live connection.
    pub peer_online: bool,
    /// The newest message, if any.
    pub last_message: Option<Message>,
    /// Messages not sent by the viewer and not yet read.
    pub unread_count: i64,
}

/// A single conversation with both participants' display identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDetail {
    /// The conversation record.
    #[serde(flatten)]
    pub conversation: Conversation,
    /// Profiles in `participant_a`, `participant_b` order.
    pub participants: Vec<ActorProfile>,
}
