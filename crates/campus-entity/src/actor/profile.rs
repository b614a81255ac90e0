//! Display identity of an actor, owned by the directory collaborator.

use campus_core::{Actor, ActorKind};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An actor with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ActorProfile {
    /// Identifier within the kind's namespace.
    pub id: i64,
    /// Actor kind.
    pub kind: ActorKind,
    /// Human-readable name.
    pub display_name: String,
}

impl ActorProfile {
    /// Build a profile.
    pub fn new(actor: Actor, display_name: impl Into<String>) -> Self {
        Self {
            id: actor.id,
            kind: actor.kind,
            display_name: display_name.into(),
        }
    }

    /// Placeholder used when the directory has no entry for the actor.
    pub fn unknown(actor: Actor) -> Self {
        Self::new(actor, actor.to_string())
    }

    /// The actor this profile describes.
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.kind)
    }
}
