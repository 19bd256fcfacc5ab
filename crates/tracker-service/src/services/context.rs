//! Service context - dependency container for services
//!
//! Holds the repository and storage ports, the token codec and the settings
//! every service reads.

use std::sync::Arc;

use chrono::Duration;
use tracker_common::auth::JwtService;
use tracker_common::AppConfig;
use tracker_core::traits::{ObjectStorage, TokenRepository, UserRepository, WorkspaceRepository};
use tracker_core::ImagePolicy;
use tracker_db::PgPool;

use super::error::{ServiceError, ServiceResult};

/// Tunables the services read on every call
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Scheme expected in front of bearer tokens
    pub token_type: String,
    pub access_ttl: Duration,
    /// Lifetime of refresh tokens and of the token record behind them
    pub refresh_ttl: Duration,
    pub image_policy: ImagePolicy,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            token_type: "Bearer".to_string(),
            access_ttl: Duration::hours(1),
            refresh_ttl: Duration::hours(2),
            image_policy: ImagePolicy::default(),
            default_page_size: 10,
            max_page_size: 50,
        }
    }
}

impl ServiceSettings {
    /// Derive settings from the loaded application config
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            token_type: config.jwt.token_type.clone(),
            access_ttl: Duration::try_seconds(config.jwt.access_token_expiry)
                .unwrap_or(Duration::MAX),
            refresh_ttl: Duration::try_seconds(config.jwt.refresh_token_expiry)
                .unwrap_or(Duration::MAX),
            image_policy: config.storage.image_policy(),
            default_page_size: config.pagination.default_page_size,
            max_page_size: config.pagination.max_items,
        }
    }
}

/// Service context containing all dependencies
///
/// Cloning is cheap; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    /// Absent when running on in-memory adapters
    pool: Option<PgPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    token_repo: Arc<dyn TokenRepository>,
    workspace_repo: Arc<dyn WorkspaceRepository>,

    storage: Arc<dyn ObjectStorage>,
    jwt_service: Arc<JwtService>,
    settings: Arc<ServiceSettings>,
}

impl ServiceContext {
    pub fn new(
        pool: Option<PgPool>,
        user_repo: Arc<dyn UserRepository>,
        token_repo: Arc<dyn TokenRepository>,
        workspace_repo: Arc<dyn WorkspaceRepository>,
        storage: Arc<dyn ObjectStorage>,
        jwt_service: Arc<JwtService>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            pool,
            user_repo,
            token_repo,
            workspace_repo,
            storage,
            jwt_service,
            settings: Arc::new(settings),
        }
    }

    /// PostgreSQL pool, if the context is backed by one
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn token_repo(&self) -> &dyn TokenRepository {
        self.token_repo.as_ref()
    }

    pub fn workspace_repo(&self) -> &dyn WorkspaceRepository {
        self.workspace_repo.as_ref()
    }

    /// Shared handle to the token repository, for background tasks
    pub fn token_repo_handle(&self) -> Arc<dyn TokenRepository> {
        Arc::clone(&self.token_repo)
    }

    // === Infrastructure ===

    pub fn storage(&self) -> &dyn ObjectStorage {
        self.storage.as_ref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    token_repo: Option<Arc<dyn TokenRepository>>,
    workspace_repo: Option<Arc<dyn WorkspaceRepository>>,
    storage: Option<Arc<dyn ObjectStorage>>,
    jwt_service: Option<Arc<JwtService>>,
    settings: Option<ServiceSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn token_repo(mut self, repo: Arc<dyn TokenRepository>) -> Self {
        self.token_repo = Some(repo);
        self
    }

    pub fn workspace_repo(mut self, repo: Arc<dyn WorkspaceRepository>) -> Self {
        self.workspace_repo = Some(repo);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn ObjectStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// The pool is optional and settings fall back to their defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool,
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.token_repo
                .ok_or_else(|| ServiceError::validation("token_repo is required"))?,
            self.workspace_repo
                .ok_or_else(|| ServiceError::validation("workspace_repo is required"))?,
            self.storage
                .ok_or_else(|| ServiceError::validation("storage is required"))?,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.settings.unwrap_or_default(),
        ))
    }
}
