//! Error types module
//!
//! `IngestError` is the single classification an ingestion call hands back to
//! its caller. Every stage of the pipeline fails fast into one of its variants;
//! the `ErrorMetadata` trait lets an outer layer render it without matching on
//! variants itself.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for failures caused by the uploaded media
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PROBE_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

const FORBIDDEN_MESSAGE: &str = "not allowed to upload to this video";

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not-found and wrong-owner are deliberately indistinguishable.
    #[error("Forbidden: not allowed to upload to this video")]
    Forbidden,

    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    #[error("Remux failed: {0}")]
    RemuxFailed(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Video record store error: {0}")]
    Repository(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;

impl From<io::Error> for IngestError {
    fn from(err: io::Error) -> Self {
        IngestError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, log_level).
fn ingest_error_static_metadata(
    err: &IngestError,
) -> (u16, &'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        IngestError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Upload a video/mp4 file under the size limit"),
            LogLevel::Debug,
        ),
        IngestError::Forbidden => (403, "FORBIDDEN", false, None, LogLevel::Debug),
        IngestError::ProbeFailed(_) => (
            422,
            "PROBE_FAILED",
            false,
            Some("Check that the file contains a readable video stream"),
            LogLevel::Warn,
        ),
        IngestError::RemuxFailed(_) => (
            422,
            "REMUX_FAILED",
            false,
            Some("Check that the file is a valid MP4 container"),
            LogLevel::Warn,
        ),
        IngestError::PublishFailed(_) => (
            502,
            "PUBLISH_FAILED",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        IngestError::Repository(_) => (
            500,
            "REPOSITORY_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        IngestError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
    }
}

impl IngestError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            IngestError::InvalidInput(_) => "InvalidInput",
            IngestError::Forbidden => "Forbidden",
            IngestError::ProbeFailed(_) => "ProbeFailed",
            IngestError::RemuxFailed(_) => "RemuxFailed",
            IngestError::PublishFailed(_) => "PublishFailed",
            IngestError::Repository(_) => "Repository",
            IngestError::Internal(_) => "Internal",
        }
    }
}

impl ErrorMetadata for IngestError {
    fn http_status_code(&self) -> u16 {
        ingest_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        ingest_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        ingest_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        ingest_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            IngestError::InvalidInput(msg) => msg.clone(),
            IngestError::Forbidden => FORBIDDEN_MESSAGE.to_string(),
            IngestError::ProbeFailed(msg) => format!("Could not inspect video: {}", msg),
            IngestError::RemuxFailed(msg) => format!("Could not prepare video: {}", msg),
            IngestError::PublishFailed(_) => "Could not store video".to_string(),
            IngestError::Repository(_) | IngestError::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        ingest_error_static_metadata(self).4
    }
}
