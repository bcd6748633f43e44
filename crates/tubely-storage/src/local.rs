use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::url::PublicUrlBase;
use crate::StorageBackend;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    public_base: PublicUrlBase,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/tubely/assets")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            public_base: PublicUrlBase::Distribution { base_url },
        })
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_file(
        &self,
        key: &str,
        local_path: &Path,
        _content_type: &str,
    ) -> StorageResult<()> {
        let dest = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }

        let size = fs::copy(local_path, &dest).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write object {}: {}", key, e))
        })?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.public_base.url_for(key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_file_copies_under_key() {
        let root = tempfile::tempdir().unwrap();
        let source_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("raw.mp4");
        fs::write(&source, b"processed bytes").await.unwrap();

        let storage = LocalStorage::new(root.path(), "http://localhost:8091/assets/".to_string())
            .await
            .unwrap();
        storage
            .put_file("portrait/raw.mp4", &source, "video/mp4")
            .await
            .unwrap();

        let stored = fs::read(root.path().join("portrait/raw.mp4")).await.unwrap();
        assert_eq!(stored, b"processed bytes");
        assert_eq!(
            storage.public_url("portrait/raw.mp4"),
            "http://localhost:8091/assets/portrait/raw.mp4"
        );
        // Source artifact is left for its owner to remove.
        assert!(source.exists());
    }

    #[tokio::test]
    async fn rejects_keys_outside_base() {
        let root = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(root.path(), "http://localhost".to_string())
            .await
            .unwrap();
        let err = storage
            .put_file("../escape.mp4", Path::new("/tmp/whatever"), "video/mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn missing_source_is_upload_failure() {
        let root = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(root.path(), "http://localhost".to_string())
            .await
            .unwrap();
        let err = storage
            .put_file("other/x.mp4", &root.path().join("nope.mp4"), "video/mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::UploadFailed(_)));
    }
}
