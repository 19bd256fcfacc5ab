//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Common Response Types
// ============================================================================

/// Identifier of a freshly created resource
#[derive(Debug, Clone, Serialize)]
pub struct IdResponse {
    pub id: Uuid,
}

impl IdResponse {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Page of results with offset pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, page_size: i64, total: i64, total_pages: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                page,
                page_size,
                total,
                total_pages,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// 1-based page number
    pub page: i64,
    pub page_size: i64,
    /// Matching items across all pages
    pub total: i64,
    pub total_pages: i64,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Login response
///
/// Only the access half of the pair is handed out.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Identity behind a guarded request
#[derive(Debug, Clone, Serialize)]
pub struct UserInfoResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

// ============================================================================
// Workspace Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceResponse {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    /// Object key of the uploaded image
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    /// `None` means no database is configured, which does not block readiness
    pub fn ready(database_healthy: Option<bool>) -> Self {
        let (ready, database) = match database_healthy {
            Some(true) => (true, "healthy"),
            Some(false) => (false, "unhealthy"),
            None => (true, "not_configured"),
        };
        Self {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: database.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
