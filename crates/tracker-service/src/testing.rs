//! In-memory adapters for the repository and storage ports
//!
//! Built for the crate's own unit tests and, behind the `testing` feature, for
//! the API integration tests. They mirror the PostgreSQL semantics the
//! services rely on: unique usernames and workspace names, expired token
//! records treated as absent, and case-insensitive name search ordered newest
//! first.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use tracker_common::auth::JwtService;
use tracker_common::AppError;
use tracker_core::entities::{TokenRecord, User, UserCredentials, Workspace};
use tracker_core::traits::{
    ObjectStorage, RepoResult, TokenRepository, UserRepository, WorkspaceRepository,
    WorkspaceSearch,
};
use tracker_core::DomainError;

use crate::dto::RegisterRequest;
use crate::services::{ServiceContext, ServiceSettings};

const PRIVATE_PEM: &str = include_str!("../../tracker-common/testdata/jwt_private.pem");
const PUBLIC_PEM: &str = include_str!("../../tracker-common/testdata/jwt_public.pem");

/// Registration payload for the canonical test user
pub fn alice() -> RegisterRequest {
    RegisterRequest {
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "secret123".to_string(),
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<(User, String)>>,
}

impl InMemoryUsers {
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    pub fn count_by_username(&self, username: &str) -> usize {
        self.rows
            .lock()
            .iter()
            .filter(|(u, _)| u.username == username)
            .count()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn find_credentials(&self, username: &str) -> RepoResult<Option<UserCredentials>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, hash)| UserCredentials {
                user_id: u.id,
                password_hash: hash.clone(),
            }))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        if rows.iter().any(|(u, _)| u.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }
        rows.push((user.clone(), password_hash.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTokens {
    records: Mutex<HashMap<Uuid, TokenRecord>>,
}

impl InMemoryTokens {
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Ids of every stored record, expired or not
    pub fn ids(&self) -> Vec<Uuid> {
        self.records.lock().keys().copied().collect()
    }

    /// Move a record's expiry into the past
    pub fn expire(&self, id: Uuid) {
        if let Some(record) = self.records.lock().get_mut(&id) {
            record.expired_at = Utc::now() - Duration::seconds(1);
        }
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokens {
    async fn create(&self, record: &TokenRecord) -> RepoResult<()> {
        self.records.lock().insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<TokenRecord>> {
        Ok(self
            .records
            .lock()
            .get(&id)
            .filter(|r| !r.is_expired())
            .cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.records.lock().remove(&id).is_some())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> RepoResult<u64> {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, r| r.user_id != user_id);
        Ok((before - records.len()) as u64)
    }

    async fn delete_expired(&self) -> RepoResult<u64> {
        let now = Utc::now();
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, r| !r.is_expired_at(now));
        Ok((before - records.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryWorkspaces {
    rows: Mutex<Vec<Workspace>>,
}

impl InMemoryWorkspaces {
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    fn matching(&self, search: &WorkspaceSearch) -> Vec<Workspace> {
        let needle = search.name.to_lowercase();
        let mut found: Vec<_> = self
            .rows
            .lock()
            .iter()
            .filter(|w| w.user_id == search.user_id && w.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        found
    }
}

#[async_trait]
impl WorkspaceRepository for InMemoryWorkspaces {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Workspace>> {
        Ok(self.rows.lock().iter().find(|w| w.id == id).cloned())
    }

    async fn create(&self, workspace: &Workspace) -> RepoResult<()> {
        let mut rows = self.rows.lock();
        if rows.iter().any(|w| w.name == workspace.name) {
            return Err(DomainError::WorkspaceNameAlreadyExists);
        }
        rows.push(workspace.clone());
        Ok(())
    }

    async fn count_matching(&self, search: &WorkspaceSearch) -> RepoResult<i64> {
        Ok(self.matching(search).len() as i64)
    }

    async fn find_matching(&self, search: &WorkspaceSearch) -> RepoResult<Vec<Workspace>> {
        Ok(self
            .matching(search)
            .into_iter()
            .skip(search.offset as usize)
            .take(search.limit as usize)
            .collect())
    }
}

/// Object store keeping uploads as `(key, content type, size)`
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<Vec<(String, String, usize)>>,
    failing: Mutex<bool>,
}

impl InMemoryStorage {
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().iter().map(|(k, _, _)| k.clone()).collect()
    }

    /// Content type and size of a stored object
    pub fn object(&self, key: &str) -> Option<(String, usize)> {
        self.objects
            .lock()
            .iter()
            .find(|(k, _, _)| k == key)
            .map(|(_, ct, size)| (ct.clone(), *size))
    }

    /// Make every later upload fail as if the bucket were unreachable
    pub fn fail_uploads(&self) {
        *self.failing.lock() = true;
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), DomainError> {
        if *self.failing.lock() {
            return Err(DomainError::StorageError("bucket unreachable".to_string()));
        }
        self.objects
            .lock()
            .push((key.to_string(), content_type.to_string(), body.len()));
        Ok(())
    }
}

/// Shared handles to every in-memory adapter plus the signing service
#[derive(Clone)]
pub struct MemoryBackend {
    pub users: Arc<InMemoryUsers>,
    pub tokens: Arc<InMemoryTokens>,
    pub workspaces: Arc<InMemoryWorkspaces>,
    pub storage: Arc<InMemoryStorage>,
    pub jwt: Arc<JwtService>,
}

impl MemoryBackend {
    /// Fresh, empty backend signing with the test key pair
    ///
    /// # Errors
    /// Returns an error if the bundled key pair fails to load
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            users: Arc::default(),
            tokens: Arc::default(),
            workspaces: Arc::default(),
            storage: Arc::default(),
            jwt: Arc::new(JwtService::new(PRIVATE_PEM, PUBLIC_PEM)?),
        })
    }

    /// Service context over these adapters, without a database pool
    pub fn context(&self, settings: ServiceSettings) -> ServiceContext {
        ServiceContext::new(
            None,
            self.users.clone(),
            self.tokens.clone(),
            self.workspaces.clone(),
            self.storage.clone(),
            self.jwt.clone(),
            settings,
        )
    }
}
