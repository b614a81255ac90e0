//! Presence value objects. Derived from live connections, never persisted.

use campus_core::Actor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An online actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceEntry {
    /// The actor.
    pub actor: Actor,
    /// When the actor's first live connection opened.
    pub connected_since: DateTime<Utc>,
    /// Number of live connections.
    pub connections: usize,
}

/// The full online set at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceSnapshot {
    /// Increases with every online-set change.
    pub version: u64,
    /// Online actors, sorted.
    pub online: Vec<Actor>,
}

impl PresenceSnapshot {
    /// Check whether the actor is online in this snapshot.
    pub fn contains(&self, actor: &Actor) -> bool {
        self.online.contains(actor)
    }
}
