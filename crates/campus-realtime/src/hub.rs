//! Broadcast hub: best-effort push of events to live sockets.
//!
//! Every publish serializes the frame once and queues it on each target
//! connection without waiting. A full or closed queue drops the frame for
//! that connection and is logged; it never fails the caller.

use std::sync::Arc;

use tracing::{debug, error, warn};

use campus_entity::{Conversation, Message, PresenceSnapshot, ReadReceipt};

use crate::connection::handle::{ConnectionHandle, ConnectionId, SendOutcome};
use crate::connection::pool::ConnectionPool;
use crate::message::types::OutboundMessage;
use crate::metrics::EngineMetrics;

/// Pushes messages, read receipts, and presence snapshots to sockets.
#[derive(Debug)]
pub struct BroadcastHub {
    pool: Arc<ConnectionPool>,
    metrics: Arc<EngineMetrics>,
}

impl BroadcastHub {
    /// Create a hub over a connection pool.
    pub fn new(pool: Arc<ConnectionPool>, metrics: Arc<EngineMetrics>) -> Self {
        Self { pool, metrics }
    }

    /// Push a newly stored message to both participants' connections.
    ///
    /// `origin` is skipped; the sending socket gets its own acknowledgement.
    /// Returns the number of connections the frame was queued on.
    pub fn publish_message(
        &self,
        conversation: &Conversation,
        message: &Message,
        origin: Option<ConnectionId>,
    ) -> usize {
        let targets: Vec<Arc<ConnectionHandle>> = self
            .participant_connections(conversation)
            .into_iter()
            .filter(|c| Some(c.id) != origin)
            .collect();

        let frame = OutboundMessage::MessageReceived {
            message: message.clone(),
        };
        let delivered = self.deliver(&targets, &frame);
        debug!(
            conversation_id = conversation.id,
            message_id = message.id,
            delivered,
            "Message published"
        );
        delivered
    }

    /// Push a read receipt to both participants' connections.
    pub fn publish_read(&self, conversation: &Conversation, receipt: &ReadReceipt) -> usize {
        let targets = self.participant_connections(conversation);
        self.deliver(&targets, &OutboundMessage::read(receipt))
    }

    /// Push the full online set to every connection.
    pub fn publish_presence(&self, snapshot: &PresenceSnapshot) -> usize {
        let targets = self.pool.all_connections();
        let delivered = self.deliver(&targets, &OutboundMessage::presence(snapshot));
        self.metrics.presence_broadcast();
        debug!(
            version = snapshot.version,
            online = snapshot.online.len(),
            delivered,
            "Presence published"
        );
        delivered
    }

    /// Send a frame to one connection.
    pub fn send_to_connection(&self, conn_id: &ConnectionId, frame: &OutboundMessage) -> bool {
        match self.pool.get(conn_id) {
            Some(handle) => self.deliver(&[handle], frame) == 1,
            None => {
                debug!(conn_id = %conn_id, "Send to unknown connection");
                false
            }
        }
    }

    fn participant_connections(&self, conversation: &Conversation) -> Vec<Arc<ConnectionHandle>> {
        conversation
            .participants()
            .iter()
            .flat_map(|actor| self.pool.actor_connections(actor))
            .collect()
    }

    fn deliver(&self, targets: &[Arc<ConnectionHandle>], frame: &OutboundMessage) -> usize {
        if targets.is_empty() {
            return 0;
        }

        let text = match frame.to_frame() {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Failed to serialize outbound frame");
                return 0;
            }
        };

        let mut delivered = 0u64;
        let mut dropped = 0u64;
        for conn in targets {
            match conn.send(text.clone()) {
                SendOutcome::Queued => delivered += 1,
                outcome => {
                    dropped += 1;
                    warn!(
                        conn_id = %conn.id,
                        actor = %conn.actor,
                        ?outcome,
                        "Delivery dropped"
                    );
                }
            }
        }

        self.metrics.record_delivery(delivered, dropped);
        delivered as usize
    }
}
