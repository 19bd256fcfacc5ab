//! Request guards
//!
//! Resolves the raw `Authorization` header into a typed identity. Guards only
//! read; a rejection never changes persisted state.

use chrono::Utc;
use tracker_common::auth::TokenType;
use tracker_common::AppError;
use tracker_core::entities::User;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Identity attached to a request that passed a guard
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    pub user: User,
    /// Token record the presented token was minted from
    pub token_id: Uuid,
}

/// Access/refresh token guard
pub struct GuardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GuardService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Validate a bearer header and load the identity behind it
    ///
    /// # Errors
    /// A 401 `AppError` naming the first failed check, or a repository error
    #[instrument(skip(self, header))]
    pub async fn resolve_identity(
        &self,
        header: Option<&str>,
        expected: TokenType,
    ) -> ServiceResult<RequestIdentity> {
        let token = self.extract_token(header)?;

        let claims = self.ctx.jwt_service().validate_token(token)?;
        if claims.token_type != expected {
            debug!(?expected, actual = ?claims.token_type, "Token type mismatch");
            return Err(AppError::InvalidToken.into());
        }
        let token_id = claims.token_id()?;

        let record = self
            .ctx
            .token_repo()
            .find_by_id(token_id)
            .await?
            .filter(|record| !record.is_expired_at(Utc::now()))
            .ok_or(ServiceError::App(AppError::TokenRevoked))?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(record.user_id)
            .await?
            .ok_or(ServiceError::App(AppError::UnknownUser))?;

        Ok(RequestIdentity { user, token_id })
    }

    /// Strip the configured scheme from the header value
    fn extract_token<'h>(&self, header: Option<&'h str>) -> Result<&'h str, AppError> {
        let header = header.map(str::trim).unwrap_or_default();
        if header.is_empty() {
            return Err(AppError::TokenRequired);
        }

        let token = header
            .strip_prefix(self.ctx.settings().token_type.as_str())
            .ok_or(AppError::TokenWrongFormat)?;

        Ok(token.trim())
    }
}
