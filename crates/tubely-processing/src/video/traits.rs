//! Capability traits for the external media tools.
//!
//! The pipeline only talks to ffprobe and ffmpeg through these traits, so
//! either can be replaced with a double that returns canned results.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tubely_core::IngestResult;

use crate::metadata::StreamGeometry;

/// Reads stream geometry from a media file on local disk.
#[async_trait]
pub trait MediaInspector: Send + Sync {
    /// Width and height of the first video stream. Any failure is
    /// `IngestError::ProbeFailed`.
    async fn probe(&self, path: &Path) -> IngestResult<StreamGeometry>;
}

/// Rewrites a container for progressive playback without re-encoding.
#[async_trait]
pub trait MediaTranscoder: Send + Sync {
    /// Remux `input` and return the output path, which is
    /// [`faststart_output_path`](crate::video::faststart_output_path)`(input)`.
    /// Any failure is `IngestError::RemuxFailed`. The caller owns both files.
    async fn fast_start(&self, input: &Path) -> IngestResult<PathBuf>;
}
