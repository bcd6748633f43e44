//! Video records kept in a JSON file.
//!
//! The file holds an array of records. It stands in for the application's
//! record store when running the pipeline from a shell.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tubely_core::VideoRecord;
use tubely_processing::VideoRepository;
use uuid::Uuid;

pub struct JsonFileVideoRepository {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileVideoRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<VideoRecord>> {
        let raw = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read records file {}", self.path.display()))?;
        serde_json::from_slice(&raw)
            .with_context(|| format!("Invalid records file {}", self.path.display()))
    }

    async fn store(&self, records: &[VideoRecord]) -> Result<()> {
        let json = serde_json::to_vec_pretty(records).context("Serialize records")?;

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        tokio::fs::write(&staging, json)
            .await
            .with_context(|| format!("Failed to write {}", staging.display()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl VideoRepository for JsonFileVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>> {
        let records = self.load().await?;
        Ok(records.into_iter().find(|r| r.id == id))
    }

    async fn update_video(&self, video: &VideoRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let slot = records
            .iter_mut()
            .find(|r| r.id == video.id)
            .with_context(|| format!("Video {} not found", video.id))?;
        *slot = VideoRecord {
            updated_at: Utc::now(),
            ..video.clone()
        };

        self.store(&records).await
    }
}
