//! Error handling utilities for repositories

use std::future::Future;
use std::time::Duration;

use sqlx::Error as SqlxError;
use tracker_core::error::DomainError;
use tracker_core::traits::RepoResult;

/// Deadline applied when a repository is built without an explicit one
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(180);

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Run a repository call under a deadline.
///
/// Infrastructure failures are logged here with the operation name so callers
/// higher up only see the domain error.
pub async fn with_deadline<T, F>(timeout: Duration, operation: &'static str, fut: F) -> RepoResult<T>
where
    F: Future<Output = RepoResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Err(DomainError::DatabaseError(msg))) => {
            tracing::error!(operation, error = %msg, "Database call failed");
            Err(DomainError::DatabaseError(msg))
        }
        Ok(result) => result,
        Err(_) => {
            tracing::error!(operation, timeout_secs = timeout.as_secs(), "Database call timed out");
            Err(DomainError::Timeout { operation })
        }
    }
}

/// Escape `LIKE` metacharacters so user input matches literally
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
