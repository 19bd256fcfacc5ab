//! Object storage port

use async_trait::async_trait;

use crate::error::DomainError;

/// Blob store that accepts uploads under a caller-chosen key
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload `body` under `key`. Only success or failure is reported.
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), DomainError>;
}
