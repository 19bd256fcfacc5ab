//! User entity - represents a registered account

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User entity
///
/// The password hash is deliberately not part of the entity; it is only
/// loaded through [`UserCredentials`] during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with a fresh identifier
    pub fn new(username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Minimal projection used to verify a login attempt
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub password_hash: String,
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
