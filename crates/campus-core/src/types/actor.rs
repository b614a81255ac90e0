//! Actor identity and canonical pair ordering.
//!
//! Actors are supplied by the external identity collaborator. This core
//! treats them as immutable value types: two actors are equal iff both
//! `id` and `kind` match. Every place that compares or canonicalizes a
//! pair goes through [`Actor`]'s `Eq`/`Ord` impls and [`PairKey`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The kind of identity taking part in messaging.
///
/// Variant order is significant: it defines the canonical ordering of
/// actors inside a [`PairKey`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(
    feature = "sqlx",
    derive(sqlx::Type),
    sqlx(type_name = "actor_kind", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    /// A learner.
    Primary,
    /// A staff member.
    Operator,
}

impl ActorKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Operator => "operator",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActorKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" => Ok(Self::Primary),
            "operator" => Ok(Self::Operator),
            _ => Err(AppError::validation(format!(
                "Invalid actor kind: '{s}'. Expected one of: primary, operator"
            ))),
        }
    }
}

/// An identity participating in messaging.
///
/// Field order matters for the derived `Ord`: actors sort by kind first,
/// then by id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Actor {
    /// Actor kind.
    pub kind: ActorKind,
    /// Identifier within the kind's namespace.
    pub id: i64,
}

impl Actor {
    /// Create an actor.
    pub fn new(id: i64, kind: ActorKind) -> Self {
        Self { kind, id }
    }

    /// Shorthand for a `Primary` actor.
    pub fn primary(id: i64) -> Self {
        Self::new(id, ActorKind::Primary)
    }

    /// Shorthand for an `Operator` actor.
    pub fn operator(id: i64) -> Self {
        Self::new(id, ActorKind::Operator)
    }

    /// Whether this actor is an operator.
    pub fn is_operator(&self) -> bool {
        matches!(self.kind, ActorKind::Operator)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

/// An unordered pair of actors reduced to a deterministic key.
///
/// `low <= high` always holds, so `PairKey::new(x, y) == PairKey::new(y, x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    /// The smaller actor under `Actor`'s ordering.
    pub low: Actor,
    /// The larger actor under `Actor`'s ordering.
    pub high: Actor,
}

impl PairKey {
    /// Canonicalize an unordered pair.
    pub fn new(x: Actor, y: Actor) -> Self {
        if x <= y {
            Self { low: x, high: y }
        } else {
            Self { low: y, high: x }
        }
    }

    /// Check the pairing policy: two `Primary` actors may not converse.
    pub fn is_permitted(&self) -> bool {
        self.low.is_operator() || self.high.is_operator()
    }

    /// Whether the actor is one of the pair.
    pub fn contains(&self, actor: &Actor) -> bool {
        self.low == *actor || self.high == *actor
    }

    /// Return the other member of the pair, if `actor` is a member.
    pub fn peer_of(&self, actor: &Actor) -> Option<Actor> {
        if self.low == *actor {
            Some(self.high)
        } else if self.high == *actor {
            Some(self.low)
        } else {
            None
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_requires_kind_and_id() {
        assert_eq!(Actor::primary(7), Actor::primary(7));
        assert_ne!(Actor::primary(7), Actor::operator(7));
        assert_ne!(Actor::operator(7), Actor::operator(8));
    }

    #[test]
    fn test_pair_key_is_symmetric() {
        let a = Actor::operator(7);
        let b = Actor::primary(42);
        assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
        assert_eq!(PairKey::new(a, b).low, b);
    }

    #[test]
    fn test_pair_key_orders_by_kind_then_id() {
        let key = PairKey::new(Actor::operator(1), Actor::operator(2));
        assert_eq!(key.low, Actor::operator(1));
        assert_eq!(key.high, Actor::operator(2));

        let key = PairKey::new(Actor::operator(1), Actor::primary(99));
        assert_eq!(key.low, Actor::primary(99));
    }

    #[test]
    fn test_pairing_policy() {
        assert!(!PairKey::new(Actor::primary(1), Actor::primary(2)).is_permitted());
        assert!(PairKey::new(Actor::primary(1), Actor::operator(1)).is_permitted());
        assert!(PairKey::new(Actor::operator(1), Actor::operator(2)).is_permitted());
    }

    #[test]
    fn test_peer_of() {
        let key = PairKey::new(Actor::operator(7), Actor::primary(42));
        assert_eq!(key.peer_of(&Actor::operator(7)), Some(Actor::primary(42)));
        assert_eq!(key.peer_of(&Actor::primary(42)), Some(Actor::operator(7)));
        assert_eq!(key.peer_of(&Actor::operator(8)), None);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Operator".parse::<ActorKind>().unwrap(), ActorKind::Operator);
        assert!("admin".parse::<ActorKind>().is_err());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Actor::operator(7)).expect("serialize");
        assert_eq!(json, serde_json::json!({ "kind": "operator", "id": 7 }));
    }
}
