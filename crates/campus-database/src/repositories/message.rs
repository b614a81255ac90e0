//! Message repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use campus_core::error::{AppError, ErrorKind};
use campus_core::result::AppResult;
use campus_core::Actor;
use campus_entity::Message;

use super::rows::{MESSAGE_COLUMNS, MessageRow};
use crate::store::MessageStore;

/// Repository for the `messages` table.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    /// Create a new message repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SQLSTATE for bytes the text encoding rejects, such as NUL.
const CHARACTER_NOT_IN_REPERTOIRE: &str = "22021";
/// SQLSTATE for a failed CHECK constraint.
const CHECK_VIOLATION: &str = "23514";

/// Content the database refuses maps to `Validation`; anything else is a store failure.
fn insert_error(e: sqlx::Error) -> AppError {
    let code = e
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned());
    match code.as_deref() {
        Some(CHARACTER_NOT_IN_REPERTOIRE) | Some(CHECK_VIOLATION) => {
            AppError::with_source(ErrorKind::Validation, "Message content rejected by store", e)
        }
        _ => AppError::with_source(ErrorKind::StoreUnavailable, "Failed to insert message", e),
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn append(
        &self,
        conversation_id: i64,
        sender: Actor,
        content: &str,
    ) -> AppResult<Message> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to begin transaction", e)
        })?;

        // Row lock serializes senders per conversation so ids, timestamps,
        // and last_message_at advance together.
        let last_message_at: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT last_message_at FROM conversations WHERE id = $1 FOR UPDATE",
        )
        .bind(conversation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to lock conversation", e)
        })?;

        let Some(last_message_at) = last_message_at else {
            return Err(AppError::not_found(format!(
                "Conversation {conversation_id} not found"
            )));
        };

        let row = sqlx::query_as::<_, MessageRow>(&format!(
            "INSERT INTO messages (conversation_id, sender_kind, sender_id, content, sent_at) \
             VALUES ($1, $2, $3, $4, GREATEST(clock_timestamp(), $5 + INTERVAL '1 microsecond')) \
             RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(conversation_id)
        .bind(sender.kind)
        .bind(sender.id)
        .bind(content)
        .bind(last_message_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(insert_error)?;

        sqlx::query("UPDATE conversations SET last_message_at = $2 WHERE id = $1")
            .bind(conversation_id)
            .bind(row.sent_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to update conversation timestamp",
                    e,
                )
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to commit message", e)
        })?;

        debug!(conversation_id, message_id = row.id, sender = %sender, "Message stored");
        Ok(row.into())
    }

    async fn history(&self, conversation_id: i64) -> AppResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE conversation_id = $1 ORDER BY id ASC"
        ))
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to load history", e)
        })?;

        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn mark_read(&self, conversation_id: i64, reader: Actor) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE, read_at = NOW() \
             WHERE conversation_id = $1 AND is_read = FALSE \
               AND NOT (sender_kind = $2 AND sender_id = $3)",
        )
        .bind(conversation_id)
        .bind(reader.kind)
        .bind(reader.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to mark messages read", e)
        })?;

        Ok(result.rows_affected())
    }

    async fn unread_count(&self, conversation_id: i64, actor: Actor) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages \
             WHERE conversation_id = $1 AND is_read = FALSE \
               AND NOT (sender_kind = $2 AND sender_id = $3)",
        )
        .bind(conversation_id)
        .bind(actor.kind)
        .bind(actor.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to count unread", e)
        })
    }

    async fn last_message(&self, conversation_id: i64) -> AppResult<Option<Message>> {
        sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE conversation_id = $1 \
             ORDER BY id DESC LIMIT 1"
        ))
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| row.map(Message::from))
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to load last message", e)
        })
    }

    async fn unread_counts(
        &self,
        conversation_ids: &[i64],
        actor: Actor,
    ) -> AppResult<HashMap<i64, i64>> {
        if conversation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT conversation_id, COUNT(*) FROM messages \
             WHERE conversation_id = ANY($1) AND is_read = FALSE \
               AND NOT (sender_kind = $2 AND sender_id = $3) \
             GROUP BY conversation_id",
        )
        .bind(conversation_ids)
        .bind(actor.kind)
        .bind(actor.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to count unread", e)
        })?;

        Ok(rows.into_iter().collect())
    }

    async fn last_messages(&self, conversation_ids: &[i64]) -> AppResult<HashMap<i64, Message>> {
        if conversation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "SELECT DISTINCT ON (conversation_id) {MESSAGE_COLUMNS} FROM messages \
             WHERE conversation_id = ANY($1) \
             ORDER BY conversation_id, id DESC"
        ))
        .bind(conversation_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to load last messages", e)
        })?;

        Ok(rows
            .into_iter()
            .map(|row| (row.conversation_id, Message::from(row)))
            .collect())
    }
}
