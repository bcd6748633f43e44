//! Media tool doubles

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tubely_core::{IngestError, IngestResult};

use crate::metadata::StreamGeometry;
use crate::video::{faststart_output_path, MediaInspector, MediaTranscoder};

/// Inspector returning fixed dimensions, or a fixed probe failure.
pub struct MockInspector {
    result: Result<StreamGeometry, String>,
    probed: Mutex<Vec<PathBuf>>,
}

impl MockInspector {
    pub fn returning(width: u32, height: u32) -> Self {
        let result = StreamGeometry::new(width, height)
            .ok_or_else(|| format!("video stream has zero dimension: {}x{}", width, height));
        Self {
            result,
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: Err(message.into()),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.probed.lock().unwrap().len()
    }

    /// Paths passed to `probe`, in call order.
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaInspector for MockInspector {
    async fn probe(&self, path: &Path) -> IngestResult<StreamGeometry> {
        assert!(path.exists(), "probed a file that does not exist");
        self.probed.lock().unwrap().push(path.to_path_buf());
        self.result.clone().map_err(IngestError::ProbeFailed)
    }
}

enum TranscodeBehavior {
    Copy,
    Stall,
    Fail {
        message: String,
        partial_output: bool,
    },
}

/// Transcoder that copies its input to the fast-start output path, or fails.
pub struct MockTranscoder {
    behavior: TranscodeBehavior,
    calls: AtomicUsize,
}

impl MockTranscoder {
    pub fn copying() -> Self {
        Self {
            behavior: TranscodeBehavior::Copy,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: TranscodeBehavior::Fail {
                message: message.into(),
                partial_output: false,
            },
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails after writing a truncated output file, like an interrupted ffmpeg.
    pub fn failing_with_partial_output(message: impl Into<String>) -> Self {
        Self {
            behavior: TranscodeBehavior::Fail {
                message: message.into(),
                partial_output: true,
            },
            calls: AtomicUsize::new(0),
        }
    }

    /// Writes a partial output and then never finishes, like a hung ffmpeg.
    pub fn stalling() -> Self {
        Self {
            behavior: TranscodeBehavior::Stall,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaTranscoder for MockTranscoder {
    async fn fast_start(&self, input: &Path) -> IngestResult<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let output = faststart_output_path(input);

        match &self.behavior {
            TranscodeBehavior::Copy => {
                tokio::fs::copy(input, &output)
                    .await
                    .map_err(|e| IngestError::RemuxFailed(e.to_string()))?;
                Ok(output)
            }
            TranscodeBehavior::Stall => {
                tokio::fs::write(&output, b"partial")
                    .await
                    .map_err(|e| IngestError::RemuxFailed(e.to_string()))?;
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(output)
            }
            TranscodeBehavior::Fail {
                message,
                partial_output,
            } => {
                if *partial_output {
                    tokio::fs::write(&output, b"partial")
                        .await
                        .map_err(|e| IngestError::RemuxFailed(e.to_string()))?;
                }
                Err(IngestError::RemuxFailed(message.clone()))
            }
        }
    }
}
