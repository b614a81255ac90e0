//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Total connections established.
    connections_opened: AtomicU64,
    /// Connections currently registered.
    connections_active: AtomicU64,
    /// Frames received from clients.
    frames_received: AtomicU64,
    /// Frames queued onto client sockets.
    frames_delivered: AtomicU64,
    /// Frames dropped because a socket queue was full or closed.
    deliveries_dropped: AtomicU64,
    /// Presence snapshots broadcast.
    presence_broadcasts: AtomicU64,
}

impl EngineMetrics {
    /// Create new zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection.
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a closed connection.
    pub fn connection_closed(&self) {
        // Saturate rather than wrap if close is ever recorded twice.
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
    }

    /// Record an inbound frame.
    pub fn frame_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of a fan-out.
    pub fn record_delivery(&self, delivered: u64, dropped: u64) {
        self.frames_delivered.fetch_add(delivered, Ordering::Relaxed);
        self.deliveries_dropped.fetch_add(dropped, Ordering::Relaxed);
    }

    /// Record a presence broadcast.
    pub fn presence_broadcast(&self) {
        self.presence_broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_delivered: self.frames_delivered.load(Ordering::Relaxed),
            deliveries_dropped: self.deliveries_dropped.load(Ordering::Relaxed),
            presence_broadcasts: self.presence_broadcasts.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections ever established.
    pub connections_opened: u64,
    /// Currently active connections.
    pub connections_active: u64,
    /// Frames received from clients.
    pub frames_received: u64,
    /// Frames queued onto client sockets.
    pub frames_delivered: u64,
    /// Frames dropped on full or closed sockets.
    pub deliveries_dropped: u64,
    /// Presence snapshots broadcast.
    pub presence_broadcasts: u64,
}
