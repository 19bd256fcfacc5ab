//! Workspace database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for workspaces table
#[derive(Debug, Clone, FromRow)]
pub struct WorkspaceModel {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
