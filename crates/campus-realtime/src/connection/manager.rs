//! Connection manager: connection lifecycle tied to presence.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use campus_core::Actor;
use campus_core::config::RealtimeConfig;

use super::handle::{ConnectionHandle, ConnectionId};
use super::heartbeat::HeartbeatConfig;
use super::pool::ConnectionPool;
use crate::hub::BroadcastHub;
use crate::message::types::OutboundMessage;
use crate::metrics::EngineMetrics;
use crate::presence::registry::PresenceRegistry;

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: Arc<ConnectionPool>,
    /// Presence registry.
    presence: Arc<PresenceRegistry>,
    /// Broadcast hub.
    hub: Arc<BroadcastHub>,
    /// Metrics.
    metrics: Arc<EngineMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        pool: Arc<ConnectionPool>,
        presence: Arc<PresenceRegistry>,
        hub: Arc<BroadcastHub>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            pool,
            presence,
            hub,
            metrics,
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the connection handle and a receiver for outbound frames.
    /// The new connection always receives a presence snapshot. When the
    /// actor already has `max_connections_per_actor` connections, the
    /// oldest is closed.
    pub fn register(&self, actor: Actor) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(actor, tx));

        self.pool.add(handle.clone());
        self.metrics.connection_opened();

        match self.presence.connect(actor) {
            Some(snapshot) => {
                self.hub.publish_presence(&snapshot);
            }
            None => {
                let snapshot = self.presence.snapshot();
                self.hub
                    .send_to_connection(&handle.id, &OutboundMessage::presence(&snapshot));
            }
        }

        // Register first, then evict, so the actor never flickers offline.
        let limit = self.config.max_connections_per_actor.max(1);
        let existing = self.pool.actor_connections(&actor);
        if existing.len() > limit {
            warn!(
                actor = %actor,
                count = existing.len(),
                max = limit,
                "Actor at max connections, closing oldest"
            );
            for oldest in existing.iter().take(existing.len() - limit) {
                self.unregister(&oldest.id);
            }
        }

        info!(conn_id = %handle.id, actor = %actor, "WebSocket connection registered");
        (handle, rx)
    }

    /// Unregisters a connection. A second call for the same ID is a no-op.
    ///
    /// Publishes a presence snapshot when this was the actor's last connection.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        let Some(handle) = self.pool.remove(conn_id) else {
            return;
        };

        handle.close();
        self.metrics.connection_closed();

        if let Some(snapshot) = self.presence.disconnect(handle.actor) {
            self.hub.publish_presence(&snapshot);
        }

        info!(conn_id = %conn_id, actor = %handle.actor, "WebSocket connection unregistered");
    }

    /// Closes all connections without broadcasting presence.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            if self.pool.remove(&conn.id).is_some() {
                conn.close();
                self.metrics.connection_closed();
                self.presence.disconnect(conn.actor);
            }
        }
        info!(count = all.len(), "All connections closed");
    }

    /// Looks up a live connection.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.pool.get(conn_id)
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Heartbeat settings for new connections.
    pub fn heartbeat_config(&self) -> HeartbeatConfig {
        HeartbeatConfig::from(&self.config)
    }
}
