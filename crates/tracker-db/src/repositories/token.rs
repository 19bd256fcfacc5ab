//! PostgreSQL implementation of TokenRepository
//!
//! There is no TTL index in PostgreSQL, so every read filters on `expired_at`
//! and [`crate::reaper`] purges stale rows in the background.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use tracker_core::entities::TokenRecord;
use tracker_core::traits::{RepoResult, TokenRepository};

use crate::models::TokenModel;

use super::error::{map_db_error, with_deadline, DEFAULT_QUERY_TIMEOUT};

#[derive(Clone)]
pub struct PgTokenRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    #[instrument(skip(self, record), fields(token_id = %record.id, user_id = %record.user_id))]
    async fn create(&self, record: &TokenRecord) -> RepoResult<()> {
        with_deadline(self.timeout, "tokens.create", async {
            sqlx::query(
                r"
                INSERT INTO tokens (id, user_id, expired_at, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(record.id)
            .bind(record.user_id)
            .bind(record.expired_at)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<TokenRecord>> {
        with_deadline(self.timeout, "tokens.find_by_id", async {
            let result = sqlx::query_as::<_, TokenModel>(
                r"
                SELECT id, user_id, expired_at, created_at, updated_at
                FROM tokens
                WHERE id = $1 AND expired_at > NOW()
                ",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(result.map(TokenRecord::from))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: Uuid) -> RepoResult<bool> {
        with_deadline(self.timeout, "tokens.delete_by_id", async {
            let result = sqlx::query("DELETE FROM tokens WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_by_user(&self, user_id: Uuid) -> RepoResult<u64> {
        with_deadline(self.timeout, "tokens.delete_by_user", async {
            let result = sqlx::query("DELETE FROM tokens WHERE user_id = $1")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

            Ok(result.rows_affected())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self) -> RepoResult<u64> {
        with_deadline(self.timeout, "tokens.delete_expired", async {
            let result = sqlx::query("DELETE FROM tokens WHERE expired_at <= NOW()")
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

            Ok(result.rows_affected())
        })
        .await
    }
}
