//! Response DTOs.

use serde::{Deserialize, Serialize};

use campus_realtime::metrics::MetricsSnapshot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count value.
    pub count: i64,
}

/// Result of a mark-read call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponse {
    /// Conversation ID.
    pub conversation_id: i64,
    /// Messages that flipped to read.
    pub updated_count: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Store backend name.
    pub store_provider: String,
    /// Store reachability.
    pub store: String,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Online actors.
    pub online_actors: usize,
    /// Realtime engine counters.
    pub realtime: MetricsSnapshot,
}
