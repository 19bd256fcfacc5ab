//! Token guard extractors
//!
//! Both guards read the raw `Authorization` header so that a missing header, a
//! wrong scheme and a bad token each surface with their own error.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracker_common::{AppError, TokenType};
use tracker_service::{GuardService, RequestIdentity};

use crate::response::ApiError;
use crate::state::AppState;

/// Caller authenticated with an access token
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestIdentity);

/// Caller authenticated with a refresh token
///
/// Carries the token record id alongside the user.
#[derive(Debug, Clone)]
pub struct RefreshUser(pub RequestIdentity);

async fn guard<S>(parts: &Parts, state: &S, expected: TokenType) -> Result<RequestIdentity, ApiError>
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    let header = match parts.headers.get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AppError::TokenWrongFormat)?),
        None => None,
    };

    let app_state = AppState::from_ref(state);
    GuardService::new(app_state.service_context())
        .resolve_identity(header, expected)
        .await
        .map_err(|e| {
            if e.is_unauthorized() {
                tracing::debug!(error = %e, "Guard rejected request");
            }
            ApiError::from(e)
        })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, state, TokenType::Access).await.map(Self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RefreshUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        guard(parts, state, TokenType::Refresh).await.map(Self)
    }
}
