//! PostgreSQL implementation of WorkspaceRepository

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use tracker_core::entities::Workspace;
use tracker_core::error::DomainError;
use tracker_core::traits::{RepoResult, WorkspaceRepository, WorkspaceSearch};

use crate::models::WorkspaceModel;

use super::error::{
    escape_like, map_db_error, map_unique_violation, with_deadline, DEFAULT_QUERY_TIMEOUT,
};

#[derive(Clone)]
pub struct PgWorkspaceRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgWorkspaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_QUERY_TIMEOUT)
    }

    pub fn with_timeout(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl WorkspaceRepository for PgWorkspaceRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Workspace>> {
        with_deadline(self.timeout, "workspaces.find_by_id", async {
            let result = sqlx::query_as::<_, WorkspaceModel>(
                r"
                SELECT id, name, user_id, image, created_at, updated_at
                FROM workspaces
                WHERE id = $1
                ",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(result.map(Workspace::from))
        })
        .await
    }

    #[instrument(skip(self, workspace), fields(workspace_id = %workspace.id))]
    async fn create(&self, workspace: &Workspace) -> RepoResult<()> {
        with_deadline(self.timeout, "workspaces.create", async {
            sqlx::query(
                r"
                INSERT INTO workspaces (id, name, user_id, image, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(workspace.id)
            .bind(&workspace.name)
            .bind(workspace.user_id)
            .bind(&workspace.image)
            .bind(workspace.created_at)
            .bind(workspace.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::WorkspaceNameAlreadyExists))?;

            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn count_matching(&self, search: &WorkspaceSearch) -> RepoResult<i64> {
        with_deadline(self.timeout, "workspaces.count_matching", async {
            sqlx::query_scalar::<_, i64>(
                r"
                SELECT COUNT(*)
                FROM workspaces
                WHERE user_id = $1 AND name ILIKE '%' || $2 || '%' ESCAPE '\'
                ",
            )
            .bind(search.user_id)
            .bind(escape_like(&search.name))
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_matching(&self, search: &WorkspaceSearch) -> RepoResult<Vec<Workspace>> {
        with_deadline(self.timeout, "workspaces.find_matching", async {
            let rows = sqlx::query_as::<_, WorkspaceModel>(
                r"
                SELECT id, name, user_id, image, created_at, updated_at
                FROM workspaces
                WHERE user_id = $1 AND name ILIKE '%' || $2 || '%' ESCAPE '\'
                ORDER BY created_at DESC, id DESC
                LIMIT $3 OFFSET $4
                ",
            )
            .bind(search.user_id)
            .bind(escape_like(&search.name))
            .bind(search.limit)
            .bind(search.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(rows.into_iter().map(Workspace::from).collect())
        })
        .await
    }
}
