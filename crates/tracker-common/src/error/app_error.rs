//! Application error types
//!
//! Unified error handling for the entire application.

use tracker_core::DomainError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token is required")]
    TokenRequired,

    #[error("Token is wrong format")]
    TokenWrongFormat,

    #[error("Token is wrong")]
    InvalidToken,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is revoked")]
    TokenRevoked,

    /// The token was valid but its user no longer exists
    #[error("User not found")]
    UnknownUser,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("URL not found")]
    UrlNotFound,

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::Validation(_) => 400,

            // 401 Unauthorized
            Self::InvalidCredentials
            | Self::TokenRequired
            | Self::TokenWrongFormat
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::TokenRevoked
            | Self::UnknownUser => 401,

            // 404 Not Found
            Self::UrlNotFound => 404,

            // 500 Internal Server Error
            Self::Database(_)
            | Self::Signing(_)
            | Self::Internal(_)
            | Self::Config(_) => 500,

            // Map domain errors to appropriate status codes
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::TokenRequired => "TOKEN_REQUIRED",
            Self::TokenWrongFormat => "TOKEN_WRONG_FORMAT",
            Self::InvalidToken => "TOKEN_WRONG",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenRevoked => "TOKEN_REVOKED",
            Self::UnknownUser => "USER_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UrlNotFound => "URL_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Signing(_) => "SIGNING_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }
}
