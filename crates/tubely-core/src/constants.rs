//! Fixed values of the ingestion contract.

/// Multipart field that must carry the uploaded video.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Default upload cap: 1 GiB.
pub const DEFAULT_MAX_VIDEO_SIZE_BYTES: u64 = 1 << 30;

/// The only media type accepted by default.
pub const VIDEO_MP4_CONTENT_TYPE: &str = "video/mp4";

/// Extension appended to every generated video filename.
pub const VIDEO_FILE_EXTENSION: &str = "mp4";

/// Number of random bytes in a generated filename.
pub const FILENAME_RANDOM_BYTES: usize = 32;

/// Suffix appended to a raw artifact path to name its fast-start output.
pub const FASTSTART_SUFFIX: &str = ".processed";
