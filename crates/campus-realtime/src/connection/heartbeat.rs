//! Ping/pong heartbeat for WebSocket keepalive.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time;
use tracing::{debug, warn};

use campus_core::config::RealtimeConfig;

use super::handle::{ConnectionHandle, SendOutcome};
use crate::message::types::OutboundMessage;

/// Heartbeat configuration.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Interval between pings.
    pub ping_interval: Duration,
    /// Silence after which the connection is considered dead.
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds.max(1)),
            ping_timeout: Duration::from_secs(config.ping_timeout_seconds.max(1)),
        }
    }
}

/// Run the heartbeat loop for a connection.
///
/// Sends periodic pings and returns once the connection is dead: the peer
/// stayed silent past the timeout, the outbound queue closed, or the
/// server closed the handle. The caller treats a return as a disconnect.
pub async fn run_heartbeat(handle: Arc<ConnectionHandle>, config: HeartbeatConfig) {
    let mut interval = time::interval(config.ping_interval);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;

        if !handle.is_alive() {
            break;
        }

        let elapsed = Utc::now() - handle.last_pong().await;
        if let Ok(elapsed) = elapsed.to_std() {
            if elapsed > config.ping_timeout {
                warn!(
                    conn_id = %handle.id,
                    actor = %handle.actor,
                    silent_for = ?elapsed,
                    "Heartbeat timeout"
                );
                handle.close();
                break;
            }
        }

        let ping = OutboundMessage::Ping {
            timestamp: Utc::now().timestamp_millis(),
        };
        let Ok(frame) = ping.to_frame() else {
            continue;
        };
        if handle.send(frame) == SendOutcome::Closed {
            debug!(conn_id = %handle.id, "Ping send failed, connection closed");
            break;
        }
    }

    debug!(conn_id = %handle.id, "Heartbeat loop ended");
}
