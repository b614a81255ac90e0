//! Store traits for the durable messaging state.
//!
//! Implementations must uphold the invariants the services rely on:
//! one conversation per unordered actor pair, strictly increasing
//! message ids and timestamps within a conversation, and read state that
//! only ever moves from unread to read.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use campus_core::result::AppResult;
use campus_core::{Actor, ActorKind, PairKey};
use campus_entity::{ActorProfile, Conversation, Message};

use crate::connection::DatabasePool;
use crate::memory::{MemoryDirectory, MemoryStore};
use crate::repositories::{ConversationRepository, DirectoryRepository, MessageRepository};

/// Durable conversation records.
#[async_trait]
pub trait ConversationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the conversation for `key`, inserting it if absent.
    ///
    /// The boolean is `true` when this call created the row. Concurrent
    /// calls for the same key must yield the same conversation. The
    /// pairing policy is checked by the caller.
    async fn get_or_create(&self, key: PairKey) -> AppResult<(Conversation, bool)>;

    /// Look up a conversation by ID.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Conversation>>;

    /// Look up a conversation by its canonical pair.
    async fn find_by_pair(&self, key: PairKey) -> AppResult<Option<Conversation>>;

    /// Conversations the actor participates in, plus every
    /// operator-involving conversation when the actor is an operator.
    async fn list_visible_to(&self, actor: Actor) -> AppResult<Vec<Conversation>>;
}

/// Durable, ordered message log with read state.
#[async_trait]
pub trait MessageStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a message and bump the conversation's `last_message_at` in
    /// one atomic step. Fails with `NotFound` for an unknown conversation.
    async fn append(&self, conversation_id: i64, sender: Actor, content: &str)
    -> AppResult<Message>;

    /// All messages of a conversation in ascending order.
    async fn history(&self, conversation_id: i64) -> AppResult<Vec<Message>>;

    /// Mark every unread message not sent by `reader` as read.
    ///
    /// Returns the number of messages that changed.
    async fn mark_read(&self, conversation_id: i64, reader: Actor) -> AppResult<u64>;

    /// Count messages not sent by `actor` that are still unread.
    async fn unread_count(&self, conversation_id: i64, actor: Actor) -> AppResult<i64>;

    /// The newest message of a conversation.
    async fn last_message(&self, conversation_id: i64) -> AppResult<Option<Message>>;

    /// Batched [`unread_count`](Self::unread_count). Conversations with no
    /// unread messages may be absent from the map.
    async fn unread_counts(
        &self,
        conversation_ids: &[i64],
        actor: Actor,
    ) -> AppResult<HashMap<i64, i64>>;

    /// Batched [`last_message`](Self::last_message). Conversations without
    /// messages are absent from the map.
    async fn last_messages(&self, conversation_ids: &[i64]) -> AppResult<HashMap<i64, Message>>;
}

/// Display identities, owned by the identity collaborator.
#[async_trait]
pub trait ActorDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// List known actors, optionally filtered by kind.
    async fn list(&self, kind: Option<ActorKind>) -> AppResult<Vec<ActorProfile>>;

    /// Resolve profiles for the given actors. Unknown actors are absent.
    async fn profiles(&self, actors: &[Actor]) -> AppResult<HashMap<Actor, ActorProfile>>;

    /// Record or update an actor's display name.
    async fn upsert(&self, profile: &ActorProfile) -> AppResult<()>;
}

/// The set of stores one server instance runs against.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Conversation records.
    pub conversations: Arc<dyn ConversationStore>,
    /// Message log.
    pub messages: Arc<dyn MessageStore>,
    /// Actor display identities.
    pub directory: Arc<dyn ActorDirectory>,
    /// The backing pool, when running against PostgreSQL.
    pub database: Option<DatabasePool>,
}

impl Stores {
    /// Stores backed by PostgreSQL.
    pub fn postgres(database: DatabasePool) -> Self {
        let pool = database.pool().clone();
        Self {
            conversations: Arc::new(ConversationRepository::new(pool.clone())),
            messages: Arc::new(MessageRepository::new(pool.clone())),
            directory: Arc::new(DirectoryRepository::new(pool)),
            database: Some(database),
        }
    }

    /// Process-local stores. State is lost on restart.
    pub fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            conversations: Arc::new(store.clone()),
            messages: Arc::new(store),
            directory: Arc::new(MemoryDirectory::new()),
            database: None,
        }
    }

    /// Name of the active backend.
    pub fn provider_name(&self) -> &'static str {
        if self.database.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Check that the backing store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.database {
            Some(db) => db.health_check().await,
            None => Ok(true),
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
    }
}
