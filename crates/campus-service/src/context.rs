//! Request context carrying the authenticated actor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_core::Actor;

/// Context for the current authenticated request.
///
/// Built by the HTTP extractor or the WebSocket session and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated actor.
    pub actor: Actor,
    /// Display name from the identity token, if any.
    pub display_name: Option<String>,
    /// The WebSocket connection the request arrived on, if any.
    pub connection_id: Option<Uuid>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            display_name: None,
            connection_id: None,
            request_time: Utc::now(),
        }
    }

    /// Attach a display name.
    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name;
        self
    }

    /// Attach the originating WebSocket connection.
    pub fn with_connection(mut self, connection_id: Uuid) -> Self {
        self.connection_id = Some(connection_id);
        self
    }
}
