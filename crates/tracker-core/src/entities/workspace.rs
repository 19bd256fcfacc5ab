//! Workspace entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A named workspace owned by a single user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    /// Object key of the uploaded image, if any
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    pub fn new(name: String, user_id: Uuid, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            user_id,
            image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check ownership
    #[inline]
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
