//! Test helpers for pipeline unit and integration tests
//!
//! Doubles for the media tools, the storage backend and the record store, so
//! the orchestrator can be exercised without ffmpeg, a bucket or a database.

pub mod mock_media;
pub mod mock_repositories;
pub mod mock_storage;
#[cfg(unix)]
pub mod stub_tool;

pub use mock_media::{MockInspector, MockTranscoder};
pub use mock_repositories::InMemoryVideoRepository;
pub use mock_storage::RecordingStorage;
#[cfg(unix)]
pub use stub_tool::write_stub_tool;

use tubely_core::constants::VIDEO_FORM_FIELD;
use tubely_core::{FilePart, FormField, UploadRequest};
use uuid::Uuid;

/// An upload request with a single `video` file part backed by `body`.
///
/// `declared_size` is passed through unchanged so tests can declare a size
/// that does not match the body.
pub fn video_request(
    video_id: Uuid,
    content_type: &str,
    declared_size: u64,
    body: Vec<u8>,
) -> UploadRequest {
    let part = FilePart::new(
        content_type,
        declared_size,
        Box::pin(std::io::Cursor::new(body)),
    )
    .with_filename("upload.mp4");
    UploadRequest::new(video_id, vec![FormField::file(VIDEO_FORM_FIELD, part)])
}
