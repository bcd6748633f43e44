//! Video ingestion orchestration: validate → buffer → probe → remux → publish.
//!
//! Each call runs sequentially and keeps its temporary artifacts in its own
//! scratch directory; concurrent calls share nothing but the parent temp
//! directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tubely_core::constants::VIDEO_FORM_FIELD;
use tubely_core::{
    FilePart, FormValue, IngestError, IngestResult, IngestSettings, UploadBody, UploadRequest,
    VideoRecord,
};
use tubely_storage::Storage;
use uuid::Uuid;

use super::naming::{StorageKey, VideoFilename};
use super::scratch::ScratchDir;
use crate::publish::VideoPublisher;
use crate::repository::VideoRepository;
use crate::video::{
    FfmpegTranscoder, FfprobeInspector, MediaInspector, MediaTranscoder, Orientation,
};

pub struct VideoIngestor {
    settings: IngestSettings,
    inspector: Arc<dyn MediaInspector>,
    transcoder: Arc<dyn MediaTranscoder>,
    publisher: VideoPublisher,
    videos: Arc<dyn VideoRepository>,
}

impl VideoIngestor {
    pub fn new(
        settings: IngestSettings,
        inspector: Arc<dyn MediaInspector>,
        transcoder: Arc<dyn MediaTranscoder>,
        storage: Arc<dyn Storage>,
        videos: Arc<dyn VideoRepository>,
    ) -> Self {
        Self {
            settings,
            inspector,
            transcoder,
            publisher: VideoPublisher::new(storage),
            videos,
        }
    }

    /// Build an ingestor backed by the ffprobe and ffmpeg binaries named in
    /// `settings`.
    pub fn with_ffmpeg(
        settings: IngestSettings,
        storage: Arc<dyn Storage>,
        videos: Arc<dyn VideoRepository>,
    ) -> Result<Self> {
        let inspector = FfprobeInspector::new(settings.ffprobe_path.clone())
            .context("Failed to initialize ffprobe inspector")?;
        let transcoder = FfmpegTranscoder::new(settings.ffmpeg_path.clone())
            .context("Failed to initialize ffmpeg transcoder")?;
        Ok(Self::new(
            settings,
            Arc::new(inspector),
            Arc::new(transcoder),
            storage,
            videos,
        ))
    }

    /// Run the pipeline for one upload and return the record with its new
    /// `video_url`. The record is not persisted; see
    /// [`ingest_and_persist`](Self::ingest_and_persist).
    #[tracing::instrument(skip(self, request), fields(video_id = %request.video_id, owner_id = %owner_id))]
    pub async fn ingest(
        &self,
        mut request: UploadRequest,
        owner_id: Uuid,
    ) -> IngestResult<VideoRecord> {
        let part = match request.take_field(VIDEO_FORM_FIELD) {
            Some(FormValue::File(part)) => part,
            Some(FormValue::Text(_)) | None => {
                return Err(IngestError::InvalidInput("bad video file".to_string()));
            }
        };
        self.validate_part(&part)?;

        let video = self.authorize(request.video_id, owner_id).await?;

        let FilePart {
            content_type,
            size,
            content,
            ..
        } = part;

        let scratch = ScratchDir::create_in(&self.settings.temp_dir).map_err(|e| {
            IngestError::Internal(format!("failed to create scratch directory: {}", e))
        })?;
        let filename = VideoFilename::random();
        let raw = self
            .buffer_upload(&scratch, &filename, content, size)
            .await?;

        let geometry = self.inspector.probe(&raw).await?;
        let orientation = Orientation::classify(geometry);
        tracing::info!(
            width = geometry.width,
            height = geometry.height,
            orientation = %orientation,
            "Video classified"
        );

        // The output lands next to the input, so a partial file from a failed
        // run is removed with the scratch directory.
        let remuxed = self.transcoder.fast_start(&raw).await?;

        let key = StorageKey::new(orientation, &filename);
        let url = self
            .publisher
            .publish(&remuxed, key.as_str(), &content_type)
            .await?;

        scratch.close();

        tracing::info!(key = %key, size_bytes = size, "Video ingested");

        Ok(video.with_video_url(url))
    }

    /// Run [`ingest`](Self::ingest) and persist the updated record.
    ///
    /// The object upload and the record update are not atomic: when the update
    /// fails the published object is left in place and only logged.
    pub async fn ingest_and_persist(
        &self,
        request: UploadRequest,
        owner_id: Uuid,
    ) -> IngestResult<VideoRecord> {
        let video = self.ingest(request, owner_id).await?;

        if let Err(e) = self.videos.update_video(&video).await {
            tracing::error!(
                video_id = %video.id,
                video_url = ?video.video_url,
                error = %e,
                "Video published but record update failed; object is orphaned"
            );
            return Err(IngestError::Repository(format!(
                "failed to update video record: {}",
                e
            )));
        }

        Ok(video)
    }

    fn validate_part(&self, part: &FilePart) -> IngestResult<()> {
        if part.size > self.settings.max_video_size_bytes {
            return Err(IngestError::InvalidInput("bad video size".to_string()));
        }
        if !self.settings.is_allowed_content_type(&part.content_type) {
            return Err(IngestError::InvalidInput("bad video type".to_string()));
        }
        Ok(())
    }

    /// Missing records and foreign records fail identically.
    async fn authorize(&self, video_id: Uuid, owner_id: Uuid) -> IngestResult<VideoRecord> {
        let video = self
            .videos
            .get_video(video_id)
            .await
            .map_err(|e| IngestError::Repository(format!("failed to load video record: {}", e)))?;

        match video {
            Some(video) if video.is_owned_by(owner_id) => Ok(video),
            _ => Err(IngestError::Forbidden),
        }
    }

    /// Write the request body to a fresh file in `scratch`. The body must be
    /// exactly `declared_size` bytes long.
    async fn buffer_upload(
        &self,
        scratch: &ScratchDir,
        filename: &VideoFilename,
        content: UploadBody,
        declared_size: u64,
    ) -> IngestResult<PathBuf> {
        let (path, mut file) = scratch
            .create_file(filename.as_str())
            .await
            .map_err(|e| {
                IngestError::Internal(format!("failed to create temporary file: {}", e))
            })?;

        let written = copy_limited(content, &mut file, declared_size)
            .await
            .map_err(|e| IngestError::Internal(format!("failed to buffer upload: {}", e)))?;

        if written != declared_size {
            tracing::debug!(
                declared_size,
                written,
                "Upload body does not match declared size"
            );
            return Err(IngestError::InvalidInput(
                "video body does not match declared size".to_string(),
            ));
        }

        Ok(path)
    }
}

/// Copy at most `limit + 1` bytes so an oversized body is detected without
/// reading all of it.
async fn copy_limited(content: UploadBody, file: &mut File, limit: u64) -> std::io::Result<u64> {
    let mut limited = content.take(limit.saturating_add(1));
    let written = tokio::io::copy(&mut limited, file).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(written)
}
