//! JWT claims structure carried by every token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_core::{Actor, ActorKind};

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the actor ID.
    pub sub: i64,
    /// Actor kind.
    pub kind: ActorKind,
    /// Display name, if the issuer supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token ID, for log correlation.
    pub jti: Uuid,
}

impl Claims {
    /// Returns the actor named by the token.
    pub fn actor(&self) -> Actor {
        Actor::new(self.sub, self.kind)
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The actor.
    pub actor: Actor,
    /// Display name from the token.
    pub display_name: Option<String>,
}

impl From<Claims> for AuthenticatedActor {
    fn from(claims: Claims) -> Self {
        Self {
            actor: claims.actor(),
            display_name: claims.name,
        }
    }
}
