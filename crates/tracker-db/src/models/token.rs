//! Token record database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for tokens table
#[derive(Debug, Clone, FromRow)]
pub struct TokenModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
