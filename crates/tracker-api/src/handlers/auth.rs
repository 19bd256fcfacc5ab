//! Authentication handlers
//!
//! Endpoints for registration, login, and the current identity.

use axum::{extract::State, Json};
use tracker_service::{
    AuthService, IdResponse, LoginRequest, LoginResponse, RegisterRequest, UserInfoResponse,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Json<IdResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Json(response))
}

/// Login with username and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Identity behind the access token
///
/// GET /auth/user-info. The guard already loaded the user, so this never
/// touches the repository.
pub async fn user_info(AuthUser(identity): AuthUser) -> Json<UserInfoResponse> {
    Json(UserInfoResponse::from(&identity.user))
}
