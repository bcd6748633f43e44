use std::path::Path as FsPath;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{
    Attribute, Attributes, Error as ObjectStoreError, ObjectStore, PutMultipartOptions,
    PutOptions, PutPayload, WriteMultipart,
};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::url::PublicUrlBase;
use crate::StorageBackend;

/// Part size for multipart uploads. S3 requires at least 5 MiB per part.
const UPLOAD_CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// Parts in flight per upload.
const MAX_CONCURRENT_PARTS: usize = 4;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    public_base: PublicUrlBase,
    chunk_size: usize,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `distribution_url` - Optional CDN base used for public URLs instead of the bucket
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        distribution_url: Option<String>,
    ) -> StorageResult<Self> {
        // Credentials and other settings come from the standard AWS environment.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let public_base = PublicUrlBase::for_s3(
            &bucket,
            &region,
            endpoint_url.as_deref(),
            distribution_url.as_deref(),
        );

        Ok(Self::with_store(Arc::new(store), bucket, public_base))
    }

    /// Wrap an already-built object store (e.g. `InMemory` in tests).
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        public_base: PublicUrlBase,
    ) -> Self {
        S3Storage {
            store,
            bucket: bucket.into(),
            public_base,
            chunk_size: UPLOAD_CHUNK_SIZE,
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put_file(
        &self,
        key: &str,
        local_path: &FsPath,
        content_type: &str,
    ) -> StorageResult<()> {
        validate_key(key)?;
        let start = std::time::Instant::now();

        let file = File::open(local_path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to open local artifact: {}", e))
        })?;
        let size = file
            .metadata()
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!("Failed to stat local artifact: {}", e))
            })?
            .len();
        let location = Path::from(key.to_string());

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        let result = if size <= self.chunk_size as u64 {
            self.put_single(&location, file, attributes).await
        } else {
            self.put_streaming(&location, file, attributes).await
        };

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        self.public_base.url_for(key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

impl S3Storage {
    /// One request for files that fit in a single chunk.
    async fn put_single(
        &self,
        location: &Path,
        mut file: File,
        attributes: Attributes,
    ) -> Result<(), UploadError> {
        let mut data = Vec::new();
        file.read_to_end(&mut data).await?;
        let options = PutOptions {
            attributes,
            ..Default::default()
        };
        self.store
            .put_opts(location, PutPayload::from(Bytes::from(data)), options)
            .await?;
        Ok(())
    }

    /// Multipart upload reading the file `chunk_size` bytes at a time, so
    /// memory use stays bounded by the chunk size and part concurrency.
    async fn put_streaming(
        &self,
        location: &Path,
        mut file: File,
        attributes: Attributes,
    ) -> Result<(), UploadError> {
        let options = PutMultipartOptions {
            attributes,
            ..Default::default()
        };
        let upload = self.store.put_multipart_opts(location, options).await?;
        let mut writer = WriteMultipart::new_with_chunk_size(upload, self.chunk_size);

        let mut buf = vec![0u8; self.chunk_size];
        loop {
            let n = match file.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    abort_upload(writer).await;
                    return Err(e.into());
                }
            };
            if let Err(e) = writer.wait_for_capacity(MAX_CONCURRENT_PARTS).await {
                abort_upload(writer).await;
                return Err(e.into());
            }
            writer.write(&buf[..n]);
        }

        writer.finish().await?;
        Ok(())
    }
}

async fn abort_upload(writer: WriteMultipart) {
    if let Err(e) = writer.abort().await {
        tracing::warn!(error = %e, "Failed to abort multipart upload");
    }
}

/// Failure of either the local read or the remote write.
#[derive(Debug, thiserror::Error)]
enum UploadError {
    #[error("reading local artifact: {0}")]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] ObjectStoreError),
}
