//! Tubely Video Processing Library
//!
//! This crate implements the video ingestion pipeline: probe the uploaded file,
//! classify its orientation, remux it for fast-start playback, publish it to
//! object storage and hand back the updated video record.

pub mod ingest;
pub mod metadata;
pub mod publish;
pub mod repository;
pub mod video;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types
pub use ingest::{ScratchDir, StorageKey, VideoFilename, VideoIngestor};
pub use metadata::StreamGeometry;
pub use publish::VideoPublisher;
pub use repository::VideoRepository;
pub use video::{
    faststart_output_path, FfmpegTranscoder, FfprobeInspector, MediaInspector, MediaTranscoder,
    Orientation,
};
