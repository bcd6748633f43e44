//! Publishing processed videos to object storage.

use std::path::Path;
use std::sync::Arc;

use tubely_core::{IngestError, IngestResult};
use tubely_storage::Storage;

/// Uploads a local artifact under a key and returns its public URL.
///
/// Failures are not retried here; any retry policy belongs to the storage
/// client.
#[derive(Clone)]
pub struct VideoPublisher {
    storage: Arc<dyn Storage>,
}

impl VideoPublisher {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    #[tracing::instrument(skip(self, local_path), fields(backend = %self.storage.backend_type()))]
    pub async fn publish(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> IngestResult<String> {
        self.storage
            .put_file(key, local_path, content_type)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, "Publishing video failed");
                IngestError::PublishFailed(e.to_string())
            })?;

        Ok(self.storage.public_url(key))
    }
}
