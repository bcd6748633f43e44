//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// publisher never couples to a specific provider. Retries, if any, belong to
/// the backend's own client; callers see a single success or failure.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write the file at `local_path` under `key`, tagged with `content_type`.
    async fn put_file(&self, key: &str, local_path: &Path, content_type: &str)
        -> StorageResult<()>;

    /// Public URL an object stored under `key` is served from.
    fn public_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
