//! Conversation entity model.

use campus_core::{Actor, PairKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A two-party conversation.
///
/// Participants are stored in canonical order: `participant_a` is the
/// smaller actor under `Actor`'s ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier.
    pub id: i64,
    /// First participant (canonical low).
    pub participant_a: Actor,
    /// Second participant (canonical high).
    pub participant_b: Actor,
    /// When the conversation was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the newest message, or `created_at` if none.
    pub last_message_at: DateTime<Utc>,
}

impl Conversation {
    /// The canonical key of the participant pair.
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.participant_a, self.participant_b)
    }

    /// Both participants.
    pub fn participants(&self) -> [Actor; 2] {
        [self.participant_a, self.participant_b]
    }

    /// Check whether the actor is a participant.
    pub fn is_participant(&self, actor: &Actor) -> bool {
        self.participant_a == *actor || self.participant_b == *actor
    }

    /// Check whether at least one participant is an operator.
    pub fn involves_operator(&self) -> bool {
        self.participant_a.is_operator() || self.participant_b.is_operator()
    }

    /// Check whether the actor may see this conversation.
    ///
    /// Participants always can. Operators additionally see every
    /// conversation that involves an operator (shared inbox).
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        self.is_participant(actor) || (actor.is_operator() && self.involves_operator())
    }

    /// The participant shown as "the other side" to `viewer`.
    ///
    /// For a participant this is the other participant. For a shared-inbox
    /// viewer it is `participant_a`, which is the primary participant
    /// whenever there is one since primaries sort first.
    pub fn counterpart_for(&self, viewer: &Actor) -> Actor {
        if self.participant_a == *viewer {
            self.participant_b
        } else {
            self.participant_a
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(a: Actor, b: Actor) -> Conversation {
        let key = PairKey::new(a, b);
        let now = Utc::now();
        Conversation {
            id: 1,
            participant_a: key.low,
            participant_b: key.high,
            created_at: now,
            last_message_at: now,
        }
    }

    #[test]
    fn test_visibility_shared_inbox() {
        let conv = conversation(Actor::operator(7), Actor::primary(42));
        assert!(conv.is_visible_to(&Actor::operator(7)));
        assert!(conv.is_visible_to(&Actor::primary(42)));
        assert!(conv.is_visible_to(&Actor::operator(9)));
        assert!(!conv.is_visible_to(&Actor::primary(43)));
    }

    #[test]
    fn test_counterpart_for_participant_and_inbox_viewer() {
        let conv = conversation(Actor::operator(7), Actor::primary(42));
        assert_eq!(conv.counterpart_for(&Actor::operator(7)), Actor::primary(42));
        assert_eq!(conv.counterpart_for(&Actor::primary(42)), Actor::operator(7));
        assert_eq!(conv.counterpart_for(&Actor::operator(9)), Actor::primary(42));

        let staff = conversation(Actor::operator(2), Actor::operator(1));
        assert_eq!(staff.counterpart_for(&Actor::operator(9)), Actor::operator(1));
    }
}
