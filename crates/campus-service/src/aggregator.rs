//! Conversation list aggregation.
//!
//! Builds an actor's inbox in a fixed number of store round trips: one
//! list query, one batched unread count, one batched last-message lookup,
//! and one directory lookup, regardless of how many conversations there
//! are. Presence comes from a single in-memory snapshot.

use std::sync::Arc;

use tracing::{debug, warn};

use campus_core::Actor;
use campus_core::error::AppError;
use campus_database::{ActorDirectory, ConversationStore, MessageStore};
use campus_entity::{ActorProfile, EnrichedConversation};
use campus_realtime::PresenceRegistry;

/// Composes per-actor conversation lists.
#[derive(Debug, Clone)]
pub struct ConversationListAggregator {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    directory: Arc<dyn ActorDirectory>,
    presence: Arc<PresenceRegistry>,
}

impl ConversationListAggregator {
    /// Creates a new aggregator.
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        directory: Arc<dyn ActorDirectory>,
        presence: Arc<PresenceRegistry>,
    ) -> Self {
        Self {
            conversations,
            messages,
            directory,
            presence,
        }
    }

    /// The actor's conversations, newest activity first.
    ///
    /// Operators also see every conversation that involves an operator.
    pub async fn list_for(&self, actor: Actor) -> Result<Vec<EnrichedConversation>, AppError> {
        let conversations = self.conversations.list_visible_to(actor).await?;
        if conversations.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = conversations.iter().map(|c| c.id).collect();
        let unread = self.messages.unread_counts(&ids, actor).await?;
        let mut last = self.messages.last_messages(&ids).await?;

        let mut peers: Vec<Actor> = conversations
            .iter()
            .map(|c| c.counterpart_for(&actor))
            .collect();
        peers.sort();
        peers.dedup();

        let profiles = match self.directory.profiles(&peers).await {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!(error = %e, actor = %actor, "Actor directory unavailable, using placeholders");
                Default::default()
            }
        };
        let online = self.presence.snapshot();

        let mut list: Vec<EnrichedConversation> = conversations
            .into_iter()
            .map(|conversation| {
                let peer = conversation.counterpart_for(&actor);
                EnrichedConversation {
                    peer: profiles
                        .get(&peer)
                        .cloned()
                        .unwrap_or_else(|| ActorProfile::unknown(peer)),
                    peer_online: online.contains(&peer),
                    last_message: last.remove(&conversation.id),
                    unread_count: unread.get(&conversation.id).copied().unwrap_or(0),
                    conversation,
                }
            })
            .collect();

        list.sort_by(|a, b| {
            b.conversation
                .last_message_at
                .cmp(&a.conversation.last_message_at)
                .then_with(|| b.conversation.id.cmp(&a.conversation.id))
        });

        debug!(actor = %actor, count = list.len(), "Conversation list built");
        Ok(list)
    }
}
