//! Authentication service
//!
//! Handles user registration and login. Login persists a token record and
//! mints the token pair from its id, so deleting the record revokes both halves.

use tracker_common::auth::{dummy_password_hash, hash_password, verify_password, TokenPair};
use tracker_common::AppError;
use tracker_core::entities::{TokenRecord, User};
use tracker_core::DomainError;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{IdResponse, LoginRequest, LoginResponse, RegisterRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user
    ///
    /// Username uniqueness is left to the repository; the losing writer of a
    /// concurrent registration gets a conflict.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<IdResponse> {
        let password_hash = hash_password(&request.password)?;

        let user = User::new(request.username, request.email);

        self.ctx
            .user_repo()
            .create(&user, &password_hash)
            .await
            .map_err(|e| {
                if matches!(e, DomainError::UsernameAlreadyExists) {
                    warn!("Registration rejected: username taken");
                }
                e
            })?;

        info!(user_id = %user.id, "User registered");

        Ok(IdResponse::new(user.id))
    }

    /// Login with username and password
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        let credentials = self
            .ctx
            .user_repo()
            .find_credentials(&request.username)
            .await?;

        // Unknown users still pay for one hash check
        let stored_hash = match &credentials {
            Some(credentials) => credentials.password_hash.as_str(),
            None => dummy_password_hash(),
        };
        let verified = verify_password(&request.password, stored_hash);

        let credentials = match credentials {
            Some(credentials) if verified => credentials,
            Some(credentials) => {
                warn!(user_id = %credentials.user_id, "Login failed: invalid password");
                return Err(ServiceError::App(AppError::InvalidCredentials));
            }
            None => {
                warn!("Login failed: user not found");
                return Err(ServiceError::App(AppError::InvalidCredentials));
            }
        };

        let pair = self.issue_session(credentials.user_id).await?;

        info!(user_id = %credentials.user_id, "User logged in");

        Ok(LoginResponse {
            access_token: pair.access_token,
            token_type: self.ctx.settings().token_type.clone(),
        })
    }

    /// Persist a token record for `user_id` and mint a pair anchored on it
    ///
    /// The record lives as long as the refresh token.
    #[instrument(skip(self))]
    pub async fn issue_session(&self, user_id: Uuid) -> ServiceResult<TokenPair> {
        let settings = self.ctx.settings();
        let record = TokenRecord::new(user_id, settings.refresh_ttl);

        self.ctx.token_repo().create(&record).await?;

        let pair = self
            .ctx
            .jwt_service()
            .generate_pair_token(record.id, settings.access_ttl, settings.refresh_ttl)
            .map_err(|e| {
                tracing::error!(token_id = %record.id, error = %e, "Token signing failed");
                ServiceError::App(e)
            })?;

        Ok(pair)
    }

    /// Delete a single token record, revoking the pair minted from it
    #[instrument(skip(self))]
    pub async fn revoke(&self, token_id: Uuid) -> ServiceResult<bool> {
        let deleted = self.ctx.token_repo().delete_by_id(token_id).await?;
        if deleted {
            info!(%token_id, "Token record revoked");
        }
        Ok(deleted)
    }

    /// Delete every token record of a user
    #[instrument(skip(self))]
    pub async fn revoke_all(&self, user_id: Uuid) -> ServiceResult<u64> {
        let deleted = self.ctx.token_repo().delete_by_user(user_id).await?;
        info!(%user_id, deleted, "Token records revoked");
        Ok(deleted)
    }
}
