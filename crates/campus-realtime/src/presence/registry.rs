//! Presence registry: the in-memory set of connected actors.
//!
//! Each actor moves between two states only: offline (absent) and online
//! (at least one live connection). Every transition bumps the registry
//! version, and snapshots are taken under the same lock as the transition
//! so a snapshot's version always matches its contents.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use campus_core::Actor;
use campus_entity::{PresenceEntry, PresenceSnapshot};

/// Per-actor connection bookkeeping.
#[derive(Debug, Clone)]
struct Slot {
    connected_since: DateTime<Utc>,
    connections: usize,
}

#[derive(Debug, Default)]
struct State {
    online: BTreeMap<Actor, Slot>,
    version: u64,
}

impl State {
    fn snapshot(&self) -> PresenceSnapshot {
        PresenceSnapshot {
            version: self.version,
            online: self.online.keys().copied().collect(),
        }
    }
}

/// Process-wide presence registry.
///
/// Never held across an await point.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    state: Mutex<State>,
}

impl PresenceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Every mutation is a single map operation, so poisoning is ignored.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a new connection for `actor`.
    ///
    /// Returns the new snapshot when the actor went from offline to online,
    /// `None` when it already had a connection.
    pub fn connect(&self, actor: Actor) -> Option<PresenceSnapshot> {
        let mut state = self.lock();
        if let Some(slot) = state.online.get_mut(&actor) {
            slot.connections += 1;
            debug!(actor = %actor, connections = slot.connections, "Additional connection");
            return None;
        }

        state.online.insert(
            actor,
            Slot {
                connected_since: Utc::now(),
                connections: 1,
            },
        );
        state.version += 1;
        info!(actor = %actor, version = state.version, "Actor online");
        Some(state.snapshot())
    }

    /// Remove one connection for `actor`.
    ///
    /// Returns the new snapshot when that was the actor's last connection.
    pub fn disconnect(&self, actor: Actor) -> Option<PresenceSnapshot> {
        let mut state = self.lock();
        let remaining = match state.online.get_mut(&actor) {
            Some(slot) => {
                slot.connections = slot.connections.saturating_sub(1);
                slot.connections
            }
            None => {
                debug!(actor = %actor, "Disconnect for actor that is not online");
                return None;
            }
        };

        if remaining > 0 {
            return None;
        }

        state.online.remove(&actor);
        state.version += 1;
        info!(actor = %actor, version = state.version, "Actor offline");
        Some(state.snapshot())
    }

    /// The current online set.
    pub fn snapshot(&self) -> PresenceSnapshot {
        self.lock().snapshot()
    }

    /// Check whether an actor is online.
    pub fn is_online(&self, actor: &Actor) -> bool {
        self.lock().online.contains_key(actor)
    }

    /// Detailed entries for every online actor.
    pub fn entries(&self) -> Vec<PresenceEntry> {
        self.lock()
            .online
            .iter()
            .map(|(actor, slot)| PresenceEntry {
                actor: *actor,
                connected_since: slot.connected_since,
                connections: slot.connections,
            })
            .collect()
    }

    /// Number of online actors.
    pub fn online_count(&self) -> usize {
        self.lock().online.len()
    }
}
