//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{TokenRecord, User, UserCredentials, Workspace};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    /// Load the stored password hash for a username
    async fn find_credentials(&self, username: &str) -> RepoResult<Option<UserCredentials>>;

    /// Create a new user.
    ///
    /// Fails with [`DomainError::UsernameAlreadyExists`] when the username is taken.
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;
}

// ============================================================================
// Token Repository
// ============================================================================

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn create(&self, record: &TokenRecord) -> RepoResult<()>;

    /// Find a record by ID. Records past `expired_at` are treated as absent.
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<TokenRecord>>;

    /// Delete one record, returning whether it existed
    async fn delete_by_id(&self, id: Uuid) -> RepoResult<bool>;

    /// Delete every record belonging to a user
    async fn delete_by_user(&self, user_id: Uuid) -> RepoResult<u64>;

    /// Purge records past `expired_at`
    async fn delete_expired(&self) -> RepoResult<u64>;
}

// ============================================================================
// Workspace Repository
// ============================================================================

/// Owner-scoped, case-insensitive name search with a page window
#[derive(Debug, Clone)]
pub struct WorkspaceSearch {
    pub user_id: Uuid,
    /// Literal substring; an empty string matches every workspace
    pub name: String,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Find workspace by ID
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Workspace>>;

    /// Create a new workspace.
    ///
    /// Fails with [`DomainError::WorkspaceNameAlreadyExists`] when the name is taken.
    async fn create(&self, workspace: &Workspace) -> RepoResult<()>;

    /// Count every workspace matching the search, ignoring the page window
    async fn count_matching(&self, search: &WorkspaceSearch) -> RepoResult<i64>;

    /// Fetch one page of matches, newest first
    async fn find_matching(&self, search: &WorkspaceSearch) -> RepoResult<Vec<Workspace>>;
}
