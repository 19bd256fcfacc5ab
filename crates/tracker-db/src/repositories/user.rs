//! PostgreSQL implementation of UserRepository

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use tracker_core::entities::{User, UserCredentials};
use tracker_core::error::DomainError;
use tracker_core::traits::{RepoResult, UserRepository};

use crate::models::{CredentialsModel, UserModel};

use super::error::{map_db_error, map_unique_violation, with_deadline, DEFAULT_QUERY_TIMEOUT};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        with_deadline(self.timeout, "users.find_by_id", async {
            let result = sqlx::query_as::<_, UserModel>(
                r"
                SELECT id, username, email, created_at, updated_at
                FROM users
                WHERE id = $1
                ",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(result.map(User::from))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_credentials(&self, username: &str) -> RepoResult<Option<UserCredentials>> {
        with_deadline(self.timeout, "users.find_credentials", async {
            let result = sqlx::query_as::<_, CredentialsModel>(
                r"
                SELECT id, password_hash FROM users WHERE username = $1
                ",
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(result.map(UserCredentials::from))
        })
        .await
    }

    #[instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        with_deadline(self.timeout, "users.create", async {
            sqlx::query(
                r"
                INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(password_hash)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::UsernameAlreadyExists))?;

            Ok(())
        })
        .await
    }
}
