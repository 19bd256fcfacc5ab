//! S3-compatible object storage

mod client;

pub use client::{S3Storage, S3StorageConfig, S3StorageError};
