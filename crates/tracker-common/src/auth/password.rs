//! Password hashing and verification
//!
//! Argon2id with a random per-hash salt and the crate's default cost parameters.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

use crate::error::AppError;

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an internal error if the algorithm rejects the input
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash
///
/// A malformed hash is logged and reported as a mismatch.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash of a throwaway password, for logins whose username matched nothing
///
/// Verifying against it costs the same as checking a real account.
pub fn dummy_password_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| {
        hash_password("tracker-dummy-password").unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build dummy password hash");
            String::new()
        })
    })
}
