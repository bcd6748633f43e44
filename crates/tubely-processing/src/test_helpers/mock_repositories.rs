//! Mock repository implementations for testing
//!
//! These mocks allow testing the pipeline without a record store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use tubely_core::VideoRecord;
use uuid::Uuid;

use crate::repository::VideoRepository;

/// Video records held in memory, with switchable failures.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<Mutex<HashMap<Uuid, VideoRecord>>>,
    fail_lookups: Arc<AtomicBool>,
    fail_updates: Arc<AtomicBool>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, video: VideoRecord) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<VideoRecord> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    /// Make every subsequent `get_video` fail.
    pub fn fail_lookups(&self) {
        self.fail_lookups.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent `update_video` fail.
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<VideoRecord>> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &VideoRecord) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            bail!("connection reset");
        }
        self.insert(video.clone());
        Ok(())
    }
}
