//! Inbound and outbound WebSocket frame definitions.

use serde::{Deserialize, Serialize};

use campus_core::{Actor, AppError};
use campus_entity::{Message, PresenceSnapshot, ReadReceipt};

/// Frames sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// The client asks for a fresh presence snapshot.
    ActorOnline,
    /// Send a message into a conversation.
    MessageSent {
        /// Target conversation.
        conversation_id: i64,
        /// Message body.
        content: String,
        /// Opaque client token echoed back in `message_accepted`.
        #[serde(default)]
        client_ref: Option<String>,
    },
    /// Mark the peer's messages in a conversation as read.
    MarkRead {
        /// Target conversation.
        conversation_id: i64,
    },
    /// Pong response to a server ping.
    Pong {
        /// Echoed timestamp.
        #[serde(default)]
        timestamp: Option<i64>,
    },
}

/// Frames sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A message was persisted into one of the actor's conversations.
    MessageReceived {
        /// The stored message.
        message: Message,
    },
    /// The message sent on this socket was stored.
    MessageAccepted {
        /// The client's token from `message_sent`.
        client_ref: Option<String>,
        /// The stored message.
        message: Message,
    },
    /// Messages in a conversation were marked read.
    MessagesRead {
        /// Conversation ID.
        conversation_id: i64,
        /// Who read them.
        reader: Actor,
        /// How many messages flipped to read.
        updated_count: u64,
    },
    /// The full online set.
    PresenceChanged {
        /// Snapshot version; clients drop snapshots older than the last seen.
        version: u64,
        /// Online actors.
        online: Vec<Actor>,
    },
    /// Server keepalive.
    Ping {
        /// Server timestamp (milliseconds since epoch).
        timestamp: i64,
    },
    /// A request on this socket failed.
    Error {
        /// Error code.
        code: String,
        /// Error description.
        message: String,
    },
}

impl OutboundMessage {
    /// Build a presence frame from a snapshot.
    pub fn presence(snapshot: &PresenceSnapshot) -> Self {
        Self::PresenceChanged {
            version: snapshot.version,
            online: snapshot.online.clone(),
        }
    }

    /// Build a read-receipt frame.
    pub fn read(receipt: &ReadReceipt) -> Self {
        Self::MessagesRead {
            conversation_id: receipt.conversation_id,
            reader: receipt.reader,
            updated_count: receipt.updated_count,
        }
    }

    /// Build an error frame from an application error.
    pub fn error(err: &AppError) -> Self {
        Self::Error {
            code: err.kind.to_string(),
            message: err.message.clone(),
        }
    }

    /// Serialize to a JSON text frame.
    pub fn to_frame(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }
}
