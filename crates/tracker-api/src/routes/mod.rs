//! Route definitions
//!
//! API routes are mounted under /api/v1; health probes sit at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, auth, health, workspaces};
use crate::state::AppState;

/// Create the API router with a JSON 404 fallback
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .fallback(handlers::not_found)
}

/// Health check routes (kept out of rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(workspace_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/user-info", get(auth::user_info))
}

fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/workspaces",
            post(workspaces::create_workspace).get(workspaces::search_workspaces),
        )
        .route("/workspaces/:workspace_id", get(workspaces::get_workspace))
}
