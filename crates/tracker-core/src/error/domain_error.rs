//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),

    #[error("Image too large: max {max} bytes")]
    ImageTooLarge { max: usize },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User already exists")]
    UsernameAlreadyExists,

    #[error("Workspace already exists")]
    WorkspaceNameAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Operation timed out: {operation}")]
    Timeout { operation: &'static str },

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::WorkspaceNotFound(_) => "WORKSPACE_NOT_FOUND",

            // Validation
            Self::UnsupportedImageType(_) => "UNSUPPORTED_IMAGE_TYPE",
            Self::ImageTooLarge { .. } => "IMAGE_TOO_LARGE",

            // Conflict
            Self::UsernameAlreadyExists => "USER_ALREADY_EXISTS",
            Self::WorkspaceNameAlreadyExists => "WORKSPACE_ALREADY_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) | Self::Timeout { .. } => "DATABASE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::WorkspaceNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedImageType(_) | Self::ImageTooLarge { .. }
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameAlreadyExists | Self::WorkspaceNameAlreadyExists
        )
    }
}
