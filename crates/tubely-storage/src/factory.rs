#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::StorageConfig;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    match config.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = S3Storage::new(
                bucket,
                region,
                config.s3_endpoint.clone(),
                config.s3_cdn_url.clone(),
            )?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local", feature = "storage-s3"))]
mod tests {
    use super::*;

    fn empty_config(backend: StorageBackend) -> StorageConfig {
        StorageConfig {
            backend,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            s3_cdn_url: None,
            local_storage_path: None,
            local_storage_base_url: None,
        }
    }

    #[tokio::test]
    async fn local_backend_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = empty_config(StorageBackend::Local);
        config.local_storage_path = Some(dir.path().to_string_lossy().to_string());
        config.local_storage_base_url = Some("http://localhost:8091/assets".to_string());

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn s3_backend_requires_bucket() {
        let mut config = empty_config(StorageBackend::S3);
        config.s3_region = Some("us-east-2".to_string());
        let err = create_storage(&config).await.err().unwrap();
        assert!(matches!(err, StorageError::ConfigError(_)));
    }

    #[tokio::test]
    async fn s3_backend_uses_distribution_url() {
        let mut config = empty_config(StorageBackend::S3);
        config.s3_bucket = Some("tubely".to_string());
        config.s3_region = Some("us-east-2".to_string());
        config.s3_cdn_url = Some("https://d1.cloudfront.net".to_string());

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(
            storage.public_url("landscape/a.mp4"),
            "https://d1.cloudfront.net/landscape/a.mp4"
        );
    }
}
