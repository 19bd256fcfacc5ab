//! Token record entity - the server-side anchor of a login session
//!
//! Signed tokens carry the record id as their subject. Deleting the record, or
//! letting it pass `expired_at`, revokes every token minted from it.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Persisted revocation anchor for one login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Create a record for `user_id` that lives for `ttl` from now
    ///
    /// An expiry past the representable range saturates.
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            expired_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the record is expired at `now`
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expired_at
    }

    /// Whether the record is expired right now
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
