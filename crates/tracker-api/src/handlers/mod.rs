//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod health;
pub mod workspaces;

use tracker_common::AppError;

use crate::response::ApiError;

/// Catch-all for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::from(AppError::UrlNotFound)
}
