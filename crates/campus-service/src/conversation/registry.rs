//! Conversation registry: pairing policy, canonical lookup, and access.

use std::sync::Arc;

use tracing::{info, warn};

use campus_core::error::AppError;
use campus_core::{Actor, PairKey};
use campus_database::{ActorDirectory, ConversationStore};
use campus_entity::{ActorProfile, Conversation, ConversationDetail};

use crate::context::RequestContext;

/// Canonicalizes actor pairs into conversations and guards access to them.
#[derive(Debug, Clone)]
pub struct ConversationRegistry {
    /// Conversation store.
    conversations: Arc<dyn ConversationStore>,
    /// Display identities.
    directory: Arc<dyn ActorDirectory>,
}

impl ConversationRegistry {
    /// Creates a new conversation registry.
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        directory: Arc<dyn ActorDirectory>,
    ) -> Self {
        Self {
            conversations,
            directory,
        }
    }

    /// Returns the one conversation between `x` and `y`, creating it on
    /// first use. Argument order does not matter.
    ///
    /// Fails with `InvalidPairing` for two primaries and `Validation` for an
    /// actor paired with itself, before anything is written.
    pub async fn get_or_create(&self, x: Actor, y: Actor) -> Result<Conversation, AppError> {
        if x == y {
            return Err(AppError::validation(
                "A conversation needs two different actors",
            ));
        }

        let key = PairKey::new(x, y);
        if !key.is_permitted() {
            warn!(pair = %key, "Rejected conversation between two primary actors");
            return Err(AppError::invalid_pairing(
                "Conversations between two primary actors are not permitted",
            ));
        }

        let (conversation, created) = self.conversations.get_or_create(key).await?;
        if created {
            info!(conversation_id = conversation.id, pair = %key, "Conversation created");
        }
        Ok(conversation)
    }

    /// Opens (or creates) the caller's conversation with `peer`.
    pub async fn open_with(
        &self,
        ctx: &RequestContext,
        peer: Actor,
    ) -> Result<Conversation, AppError> {
        self.get_or_create(ctx.actor, peer).await
    }

    /// Looks up a conversation by ID without access checks.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Conversation>, AppError> {
        self.conversations.find_by_id(id).await
    }

    /// Looks up a conversation the caller may access.
    ///
    /// Fails with `NotFound` for an unknown ID and `Authorization` when the
    /// caller is neither a participant nor a shared-inbox operator.
    pub async fn get_accessible(
        &self,
        ctx: &RequestContext,
        id: i64,
    ) -> Result<Conversation, AppError> {
        let conversation = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Conversation {id} not found")))?;

        if !conversation.is_visible_to(&ctx.actor) {
            return Err(AppError::authorization(format!(
                "{} may not access conversation {id}",
                ctx.actor
            )));
        }
        Ok(conversation)
    }

    /// The conversation with both participants' display identities.
    pub async fn detail(
        &self,
        ctx: &RequestContext,
        id: i64,
    ) -> Result<ConversationDetail, AppError> {
        let conversation = self.get_accessible(ctx, id).await?;
        let actors = conversation.participants();
        let profiles = self.directory.profiles(&actors).await.unwrap_or_else(|e| {
            warn!(error = %e, conversation_id = id, "Actor directory unavailable");
            Default::default()
        });

        let participants = actors
            .iter()
            .map(|a| {
                profiles
                    .get(a)
                    .cloned()
                    .unwrap_or_else(|| ActorProfile::unknown(*a))
            })
            .collect();

        Ok(ConversationDetail {
            conversation,
            participants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::error::ErrorKind;
    use campus_database::Stores;

    fn registry() -> ConversationRegistry {
        let stores = Stores::memory();
        ConversationRegistry::new(stores.conversations, stores.directory)
    }

    #[tokio::test]
    async fn test_symmetric_get_or_create() {
        let registry = registry();
        let x = Actor::operator(7);
        let y = Actor::primary(42);

        let first = registry.get_or_create(x, y).await.unwrap();
        let second = registry.get_or_create(y, x).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.participant_a, y);
        assert_eq!(first.created_at, first.last_message_at);
    }

    #[tokio::test]
    async fn test_two_primaries_rejected_without_write() {
        let registry = registry();
        let err = registry
            .get_or_create(Actor::primary(1), Actor::primary(2))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidPairing);

        let list = registry
            .conversations
            .list_visible_to(Actor::primary(1))
            .await
            .unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_operator_pairs_permitted() {
        let registry = registry();
        assert!(
            registry
                .get_or_create(Actor::primary(1), Actor::operator(1))
                .await
                .is_ok()
        );
        assert!(
            registry
                .get_or_create(Actor::operator(1), Actor::operator(2))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_self_pairing_rejected() {
        let registry = registry();
        let err = registry
            .get_or_create(Actor::operator(1), Actor::operator(1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_concurrent_creation_yields_one_conversation() {
        let registry = registry();
        let calls = (0..8).map(|i| {
            let registry = registry.clone();
            async move {
                if i % 2 == 0 {
                    registry.get_or_create(Actor::operator(7), Actor::primary(42)).await
                } else {
                    registry.get_or_create(Actor::primary(42), Actor::operator(7)).await
                }
            }
        });
        let results = futures::future::join_all(calls).await;
        let ids: Vec<i64> = results.into_iter().map(|r| r.unwrap().id).collect();
        assert!(ids.iter().all(|id| *id == ids[0]));
    }

    #[tokio::test]
    async fn test_access_rules() {
        let registry = registry();
        let conv = registry
            .get_or_create(Actor::operator(7), Actor::primary(42))
            .await
            .unwrap();

        let inbox = RequestContext::new(Actor::operator(9));
        assert!(registry.get_accessible(&inbox, conv.id).await.is_ok());

        let stranger = RequestContext::new(Actor::primary(43));
        let err = registry.get_accessible(&stranger, conv.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let err = registry.get_accessible(&inbox, 999).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_detail_falls_back_to_placeholder_names() {
        let stores = Stores::memory();
        stores
            .directory
            .upsert(&ActorProfile::new(Actor::operator(7), "Dana"))
            .await
            .unwrap();
        let registry = ConversationRegistry::new(stores.conversations, stores.directory);
        let conv = registry
            .get_or_create(Actor::operator(7), Actor::primary(42))
            .await
            .unwrap();

        let detail = registry
            .detail(&RequestContext::new(Actor::primary(42)), conv.id)
            .await
            .unwrap();
        assert_eq!(detail.participants[0].display_name, "primary#42");
        assert_eq!(detail.participants[1].display_name, "Dana");
    }
}
