//! Video record store collaborator.
//!
//! The record store is owned outside this crate; the pipeline reads a record to
//! authorise the upload and hands back an updated copy for persisting.

use anyhow::Result;
use async_trait::async_trait;
use tubely_core::VideoRecord;
use uuid::Uuid;

#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Look up a record by id.
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>>;

    /// Persist an updated record.
    async fn update_video(&self, video: &VideoRecord) -> Result<()>;
}
