//! Conversation repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use campus_core::error::{AppError, ErrorKind};
use campus_core::result::AppResult;
use campus_core::{Actor, ActorKind, PairKey};
use campus_entity::Conversation;

use super::rows::{CONVERSATION_COLUMNS, ConversationRow};
use crate::store::ConversationStore;

/// Repository for the `conversations` table.
#[derive(Debug, Clone)]
pub struct ConversationRepository {
    pool: PgPool,
}

impl ConversationRepository {
    /// Create a new conversation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for ConversationRepository {
    async fn get_or_create(&self, key: PairKey) -> AppResult<(Conversation, bool)> {
        // The unique constraint arbitrates concurrent creators; the loser
        // inserts nothing and reads the winner's row below.
        let inserted = sqlx::query_as::<_, ConversationRow>(&format!(
            "INSERT INTO conversations (a_kind, a_id, b_kind, b_id) VALUES ($1, $2, $3, $4) \
             ON CONFLICT ON CONSTRAINT conversations_pair_unique DO NOTHING \
             RETURNING {CONVERSATION_COLUMNS}"
        ))
        .bind(key.low.kind)
        .bind(key.low.id)
        .bind(key.high.kind)
        .bind(key.high.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to create conversation", e)
        })?;

        if let Some(row) = inserted {
            debug!(conversation_id = row.id, pair = %key, "Conversation created");
            return Ok((row.into(), true));
        }

        let existing = self.find_by_pair(key).await?.ok_or_else(|| {
            AppError::internal(format!("Conversation for {key} vanished after conflict"))
        })?;
        Ok((existing, false))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Conversation>> {
        sqlx::query_as::<_, ConversationRow>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Conversation::from))
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find conversation", e)
        })
    }

    async fn find_by_pair(&self, key: PairKey) -> AppResult<Option<Conversation>> {
        sqlx::query_as::<_, ConversationRow>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations \
             WHERE a_kind = $1 AND a_id = $2 AND b_kind = $3 AND b_id = $4"
        ))
        .bind(key.low.kind)
        .bind(key.low.id)
        .bind(key.high.kind)
        .bind(key.high.id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Conversation::from))
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to find conversation", e)
        })
    }

    async fn list_visible_to(&self, actor: Actor) -> AppResult<Vec<Conversation>> {
        // Canonical order puts any operator participant in the `b` slot.
        let rows = sqlx::query_as::<_, ConversationRow>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations \
             WHERE (a_kind = $1 AND a_id = $2) \
                OR (b_kind = $1 AND b_id = $2) \
                OR ($3 AND b_kind = 'operator') \
             ORDER BY last_message_at DESC, id DESC"
        ))
        .bind(actor.kind)
        .bind(actor.id)
        .bind(actor.kind == ActorKind::Operator)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list conversations", e)
        })?;

        Ok(rows.into_iter().map(Conversation::from).collect())
    }
}
