//! Mock Storage implementation for testing

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tubely_storage::{Storage, StorageBackend, StorageError, StorageResult};

const PUBLIC_BASE: &str = "https://cdn.example.com";

/// In-memory storage that records every object and the content type it was
/// written with.
#[allow(clippy::type_complexity)]
pub struct RecordingStorage {
    objects: Arc<Mutex<HashMap<String, (Vec<u8>, String)>>>,
    fail_puts: bool,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            fail_puts: false,
        }
    }

    /// Storage whose every write fails.
    pub fn failing() -> Self {
        Self {
            fail_puts: true,
            ..Self::new()
        }
    }

    /// Stored bytes and content type for `key`.
    pub fn object(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for RecordingStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put_file(
        &self,
        key: &str,
        local_path: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        if self.fail_puts {
            return Err(StorageError::UploadFailed(
                "simulated storage outage".to_string(),
            ));
        }
        let data = tokio::fs::read(local_path).await?;
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", PUBLIC_BASE, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
