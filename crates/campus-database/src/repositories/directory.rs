//! Actor directory repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use campus_core::error::{AppError, ErrorKind};
use campus_core::result::AppResult;
use campus_core::{Actor, ActorKind};
use campus_entity::ActorProfile;

use crate::store::ActorDirectory;

/// Repository for the `actor_directory` table.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    /// Create a new directory repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActorDirectory for DirectoryRepository {
    async fn list(&self, kind: Option<ActorKind>) -> AppResult<Vec<ActorProfile>> {
        sqlx::query_as::<_, ActorProfile>(
            "SELECT id, kind, display_name FROM actor_directory \
             WHERE $1::actor_kind IS NULL OR kind = $1 \
             ORDER BY kind, display_name, id",
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to list actors", e)
        })
    }

    async fn profiles(&self, actors: &[Actor]) -> AppResult<HashMap<Actor, ActorProfile>> {
        if actors.is_empty() {
            return Ok(HashMap::new());
        }

        let kinds: Vec<String> = actors.iter().map(|a| a.kind.as_str().to_string()).collect();
        let ids: Vec<i64> = actors.iter().map(|a| a.id).collect();

        let rows = sqlx::query_as::<_, ActorProfile>(
            "SELECT d.id, d.kind, d.display_name FROM actor_directory d \
             JOIN UNNEST($1::text[], $2::bigint[]) AS wanted (kind, id) \
               ON d.kind::text = wanted.kind AND d.id = wanted.id",
        )
        .bind(kinds)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to resolve actors", e)
        })?;

        Ok(rows.into_iter().map(|p| (p.actor(), p)).collect())
    }

    async fn upsert(&self, profile: &ActorProfile) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO actor_directory (kind, id, display_name) VALUES ($1, $2, $3) \
             ON CONFLICT (kind, id) DO UPDATE SET display_name = EXCLUDED.display_name, \
             updated_at = NOW()",
        )
        .bind(profile.kind)
        .bind(profile.id)
        .bind(&profile.display_name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::StoreUnavailable, "Failed to upsert actor", e)
        })?;
        Ok(())
    }
}
