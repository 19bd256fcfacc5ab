//! S3 client wrapper using aws-sdk-s3.
//!
//! Works against AWS as well as S3-compatible stores (MinIO, LocalStack) when an
//! endpoint and path-style addressing are configured.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracker_core::error::DomainError;
use tracker_core::traits::ObjectStorage;

/// S3 client configuration
#[derive(Clone, Default)]
pub struct S3StorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub force_path_style: bool,
}

impl std::fmt::Debug for S3StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("force_path_style", &self.force_path_style)
            .finish_non_exhaustive()
    }
}

impl From<&tracker_common::StorageConfig> for S3StorageConfig {
    fn from(config: &tracker_common::StorageConfig) -> Self {
        Self {
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
            access_key_id: config.access_key_id.clone(),
            secret_access_key: config.secret_access_key.clone(),
            force_path_style: config.force_path_style,
        }
    }
}

impl S3StorageConfig {
    /// Static credentials, if both halves are configured.
    ///
    /// Otherwise the SDK's default provider chain is used.
    fn static_credentials(&self) -> Option<Credentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some(Credentials::new(
                id.clone(),
                secret.clone(),
                None,
                None,
                "tracker-config",
            )),
            _ => None,
        }
    }
}

/// Error type for S3 operations
#[derive(Debug, thiserror::Error)]
pub enum S3StorageError {
    #[error("Bucket name is not configured")]
    MissingBucket,

    #[error("Upload of {key} to {bucket} failed: {message}")]
    Upload {
        bucket: String,
        key: String,
        message: String,
    },
}

impl From<S3StorageError> for DomainError {
    fn from(err: S3StorageError) -> Self {
        DomainError::StorageError(err.to_string())
    }
}

/// Object storage backed by an S3 bucket
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl std::fmt::Debug for S3Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Storage")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl S3Storage {
    /// Build a client from configuration
    pub async fn new(config: S3StorageConfig) -> Result<Self, S3StorageError> {
        if config.bucket.trim().is_empty() {
            return Err(S3StorageError::MissingBucket);
        }

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(credentials) = config.static_credentials() {
            loader = loader.credentials_provider(credentials);
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            "S3 client created"
        );

        Ok(Self::from_client(Client::from_conf(s3_config), config.bucket))
    }

    /// Wrap an already configured client
    #[must_use]
    pub fn from_client(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload an object
    pub async fn upload(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), S3StorageError> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                tracing::error!(bucket = %self.bucket, key, error = %message, "S3 upload failed");
                S3StorageError::Upload {
                    bucket: self.bucket.clone(),
                    key: key.to_string(),
                    message,
                }
            })?;

        tracing::debug!(bucket = %self.bucket, key, size, "Object uploaded");
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), DomainError> {
        self.upload(key, body, content_type).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> S3StorageConfig {
        S3StorageConfig {
            bucket: "tracker-test".to_string(),
            region: "us-east-1".to_string(),
            endpoint: Some("http://127.0.0.1:1".to_string()),
            access_key_id: Some("key".to_string()),
            secret_access_key: Some("secret".to_string()),
            force_path_style: true,
        }
    }

    #[test]
    fn test_static_credentials_need_both_halves() {
        assert!(config().static_credentials().is_some());

        let partial = S3StorageConfig {
            secret_access_key: None,
            ..config()
        };
        assert!(partial.static_credentials().is_none());
    }

    #[test]
    fn test_debug_hides_secret() {
        assert!(!format!("{:?}", config()).contains("secret"));
    }

    #[tokio::test]
    async fn test_missing_bucket() {
        let result = S3Storage::new(S3StorageConfig {
            bucket: "  ".to_string(),
            ..config()
        })
        .await;
        assert!(matches!(result, Err(S3StorageError::MissingBucket)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_storage_error() {
        let storage = S3Storage::new(config()).await.unwrap();

        let result = storage
            .put_object("workspaces/a.png", vec![1, 2, 3], "image/png")
            .await;

        match result {
            Err(DomainError::StorageError(msg)) => {
                assert!(msg.contains("workspaces/a.png"));
                assert!(msg.contains("tracker-test"));
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_maps_to_domain() {
        let err: DomainError = S3StorageError::Upload {
            bucket: "b".to_string(),
            key: "k".to_string(),
            message: "denied".to_string(),
        }
        .into();
        assert_eq!(err.code(), "STORAGE_ERROR");
    }
}
