//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, RwLock, mpsc};
use tracing::warn;
use uuid::Uuid;

use campus_core::Actor;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// Outcome of queueing a frame on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The frame was queued.
    Queued,
    /// The queue was full; the frame was dropped.
    Full,
    /// The connection is closed.
    Closed,
}

/// A handle to a single WebSocket connection.
///
/// Holds the sender channel for pushing serialized frames to the socket
/// writer task, plus metadata about the connected actor.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// Actor who owns this connection.
    pub actor: Actor,
    /// Sender for outbound frames.
    sender: mpsc::Sender<String>,
    /// Last inbound frame received.
    last_pong: RwLock<DateTime<Utc>>,
    /// Whether the connection is still alive.
    alive: AtomicBool,
    /// Wakes the socket task when the server closes the connection.
    close_signal: Notify,
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(actor: Actor, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor,
            sender,
            last_pong: RwLock::new(Utc::now()),
            alive: AtomicBool::new(true),
            close_signal: Notify::new(),
        }
    }

    /// Queue a serialized frame without waiting.
    pub fn send(&self, frame: String) -> SendOutcome {
        if !self.is_alive() {
            return SendOutcome::Closed;
        }
        match self.sender.try_send(frame) {
            Ok(()) => SendOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, actor = %self.actor, "Send buffer full, dropping frame");
                SendOutcome::Full
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.alive.store(false, Ordering::SeqCst);
                SendOutcome::Closed
            }
        }
    }

    /// Check if connection is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection closed and wake its socket task.
    pub fn close(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.close_signal.notify_one();
    }

    /// Resolves once [`close`](Self::close) has been called.
    pub async fn closed(&self) {
        if !self.is_alive() {
            return;
        }
        self.close_signal.notified().await;
    }

    /// Record inbound activity from the client.
    pub async fn record_pong(&self) {
        *self.last_pong.write().await = Utc::now();
    }

    #[cfg(test)]
    pub(crate) async fn set_last_pong(&self, at: DateTime<Utc>) {
        *self.last_pong.write().await = at;
    }

    /// Time of the last pong.
    pub async fn last_pong(&self) -> DateTime<Utc> {
        *self.last_pong.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_queue_drops_frame() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(Actor::primary(1), tx);

        assert_eq!(handle.send("a".into()), SendOutcome::Queued);
        assert_eq!(handle.send("b".into()), SendOutcome::Full);
        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        assert!(handle.is_alive());
    }

    #[tokio::test]
    async fn test_closed_receiver_marks_dead() {
        let (tx, rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(Actor::primary(1), tx);
        drop(rx);

        assert_eq!(handle.send("a".into()), SendOutcome::Closed);
        assert!(!handle.is_alive());
    }

    #[tokio::test]
    async fn test_close_wakes_waiter() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = std::sync::Arc::new(ConnectionHandle::new(Actor::operator(7), tx));

        let waiter = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.closed().await })
        };
        handle.close();
        waiter.await.unwrap();
        assert_eq!(handle.send("late".into()), SendOutcome::Closed);
    }
}
