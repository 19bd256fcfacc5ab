//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    /// Argon2 accepts longer input, the cap keeps hashing cost bounded
    #[validate(length(min = 1, max = 72, message = "Password must be 1-72 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ============================================================================
// Workspace Requests
// ============================================================================

/// Text fields of the workspace creation form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkspaceRequest {
    #[validate(length(min = 1, max = 100, message = "Workspace name must be 1-100 characters"))]
    pub name: String,
}

/// Workspace search query string
///
/// `name` is matched as a case-insensitive substring; an empty name lists everything.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SearchWorkspacesQuery {
    #[serde(default)]
    #[validate(length(max = 100, message = "Search name must be at most 100 characters"))]
    pub name: String,
}
