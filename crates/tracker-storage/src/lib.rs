//! # tracker-storage
//!
//! Object storage adapter: implements the tracker-core `ObjectStorage` port on top of
//! an S3-compatible bucket.
//!
//! ## Example
//!
//! ```ignore
//! use tracker_storage::{S3Storage, S3StorageConfig};
//!
//! let storage = S3Storage::new(S3StorageConfig::from(&config.storage)).await?;
//! storage.put_object("workspaces/1.png", bytes, "image/png").await?;
//! ```

pub mod s3;

pub use s3::{S3Storage, S3StorageConfig, S3StorageError};
