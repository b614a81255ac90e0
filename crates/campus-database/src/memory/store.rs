//! In-memory conversation and message store using a Tokio mutex.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use campus_core::error::AppError;
use campus_core::result::AppResult;
use campus_core::{Actor, PairKey};
use campus_entity::{Conversation, Message};

use crate::store::{ConversationStore, MessageStore};

/// Internal state guarded by a single lock so that a message append and
/// the conversation timestamp bump are observed together.
#[derive(Debug, Default)]
struct InnerState {
    /// Conversations by ID.
    conversations: BTreeMap<i64, Conversation>,
    /// Canonical pair to conversation ID.
    by_pair: HashMap<PairKey, i64>,
    /// Messages per conversation, ascending.
    messages: HashMap<i64, Vec<Message>>,
    /// Last assigned conversation ID.
    conversation_seq: i64,
    /// Last assigned message ID.
    message_seq: i64,
}

/// In-memory store implementing both [`ConversationStore`] and
/// [`MessageStore`].
///
/// Clones share state. Suitable for single-node deployments only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations.
    pub async fn conversation_count(&self) -> usize {
        self.state.lock().await.conversations.len()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn get_or_create(&self, key: PairKey) -> AppResult<(Conversation, bool)> {
        let mut state = self.state.lock().await;

        if let Some(existing) = state
            .by_pair
            .get(&key)
            .and_then(|id| state.conversations.get(id))
        {
            return Ok((existing.clone(), false));
        }

        state.conversation_seq += 1;
        let now = Utc::now();
        let conversation = Conversation {
            id: state.conversation_seq,
            participant_a: key.low,
            participant_b: key.high,
            created_at: now,
            last_message_at: now,
        };
        state.by_pair.insert(key, conversation.id);
        state
            .conversations
            .insert(conversation.id, conversation.clone());

        debug!(conversation_id = conversation.id, pair = %key, "Conversation created");
        Ok((conversation, true))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Conversation>> {
        Ok(self.state.lock().await.conversations.get(&id).cloned())
    }

    async fn find_by_pair(&self, key: PairKey) -> AppResult<Option<Conversation>> {
        let state = self.state.lock().await;
        Ok(state
            .by_pair
            .get(&key)
            .and_then(|id| state.conversations.get(id))
            .cloned())
    }

    async fn list_visible_to(&self, actor: Actor) -> AppResult<Vec<Conversation>> {
        let state = self.state.lock().await;
        let mut list: Vec<Conversation> = state
            .conversations
            .values()
            .filter(|c| c.is_visible_to(&actor))
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            b.last_message_at
                .cmp(&a.last_message_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(list)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn append(
        &self,
        conversation_id: i64,
        sender: Actor,
        content: &str,
    ) -> AppResult<Message> {
        let mut state = self.state.lock().await;

        let last_message_at = state
            .conversations
            .get(&conversation_id)
            .map(|c| c.last_message_at)
            .ok_or_else(|| {
                AppError::not_found(format!("Conversation {conversation_id} not found"))
            })?;

        let timestamp = next_timestamp(last_message_at);
        state.message_seq += 1;
        let message = Message {
            id: state.message_seq,
            conversation_id,
            sender,
            content: content.to_string(),
            timestamp,
            is_read: false,
            read_at: None,
        };

        state
            .messages
            .entry(conversation_id)
            .or_default()
            .push(message.clone());
        if let Some(conversation) = state.conversations.get_mut(&conversation_id) {
            conversation.last_message_at = timestamp;
        }

        debug!(conversation_id, message_id = message.id, sender = %sender, "Message stored");
        Ok(message)
    }

    async fn history(&self, conversation_id: i64) -> AppResult<Vec<Message>> {
        let state = self.state.lock().await;
        Ok(state
            .messages
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn mark_read(&self, conversation_id: i64, reader: Actor) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut updated = 0;

        if let Some(messages) = state.messages.get_mut(&conversation_id) {
            for message in messages.iter_mut().filter(|m| m.is_unread_for(&reader)) {
                message.is_read = true;
                message.read_at = Some(now);
                updated += 1;
            }
        }

        Ok(updated)
    }

    async fn unread_count(&self, conversation_id: i64, actor: Actor) -> AppResult<i64> {
        let state = self.state.lock().await;
        Ok(count_unread(state.messages.get(&conversation_id), &actor))
    }

    async fn last_message(&self, conversation_id: i64) -> AppResult<Option<Message>> {
        let state = self.state.lock().await;
        Ok(state
            .messages
            .get(&conversation_id)
            .and_then(|m| m.last())
            .cloned())
    }

    async fn unread_counts(
        &self,
        conversation_ids: &[i64],
        actor: Actor,
    ) -> AppResult<HashMap<i64, i64>> {
        let state = self.state.lock().await;
        Ok(conversation_ids
            .iter()
            .map(|id| (*id, count_unread(state.messages.get(id), &actor)))
            .filter(|(_, count)| *count > 0)
            .collect())
    }

    async fn last_messages(&self, conversation_ids: &[i64]) -> AppResult<HashMap<i64, Message>> {
        let state = self.state.lock().await;
        Ok(conversation_ids
            .iter()
            .filter_map(|id| {
                state
                    .messages
                    .get(id)
                    .and_then(|m| m.last())
                    .map(|m| (*id, m.clone()))
            })
            .collect())
    }
}

/// Wall clock, pushed forward when needed so that it stays strictly after
/// the conversation's previous message.
fn next_timestamp(last_message_at: DateTime<Utc>) -> DateTime<Utc> {
    let floor = last_message_at + Duration::microseconds(1);
    Utc::now().max(floor)
}

fn count_unread(messages: Option<&Vec<Message>>, actor: &Actor) -> i64 {
    messages
        .map(|m| m.iter().filter(|msg| msg.is_unread_for(actor)).count() as i64)
        .unwrap_or(0)
}
