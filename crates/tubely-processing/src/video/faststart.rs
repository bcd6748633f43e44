//! ffmpeg wrapper - fast-start remux.
//!
//! Moves the `moov` index to the front of the container so playback can begin
//! before the whole file is downloaded. Streams are copied, never re-encoded.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tubely_core::constants::FASTSTART_SUFFIX;
use tubely_core::{IngestError, IngestResult};

use super::tool::{scrub_diagnostics, validate_tool_path};
use super::traits::MediaTranscoder;

/// Where the remuxed copy of `input` is written.
pub fn faststart_output_path(input: &Path) -> PathBuf {
    let mut output = input.as_os_str().to_owned();
    output.push(FASTSTART_SUFFIX);
    PathBuf::from(output)
}

pub struct FfmpegTranscoder {
    ffmpeg_path: String,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: impl Into<String>) -> Result<Self> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path).context("Invalid ffmpeg_path")?;
        Ok(Self { ffmpeg_path })
    }

    fn args(input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-v".into(), "error".into(), "-i".into()];
        args.push(input.as_os_str().to_owned());
        args.extend(
            [
                "-movflags",
                "faststart",
                "-map_metadata",
                "0",
                "-codec",
                "copy",
                "-f",
                "mp4",
                "-y",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());
        args
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    pub async fn remux(&self, input: &Path) -> IngestResult<PathBuf> {
        let start = std::time::Instant::now();
        let output_path = faststart_output_path(input);

        let output = Command::new(&self.ffmpeg_path)
            .args(Self::args(input, &output_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| IngestError::RemuxFailed(format!("failed to execute ffmpeg: {}", e)))?;

        if !output.status.success() {
            let diagnostics = scrub_diagnostics(&output.stderr, &[input, &output_path]);
            tracing::warn!(
                exit_code = ?output.status.code(),
                diagnostics = %diagnostics,
                "ffmpeg faststart exited with failure"
            );
            return Err(IngestError::RemuxFailed(diagnostics));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            "Fast-start remux completed"
        );

        Ok(output_path)
    }
}

#[async_trait]
impl MediaTranscoder for FfmpegTranscoder {
    async fn fast_start(&self, input: &Path) -> IngestResult<PathBuf> {
        self.remux(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_appends_suffix() {
        assert_eq!(
            faststart_output_path(Path::new("/tmp/abc.mp4")),
            PathBuf::from("/tmp/abc.mp4.processed")
        );
    }

    #[test]
    fn args_copy_streams_and_move_index() {
        let args = FfmpegTranscoder::args(
            Path::new("/tmp/abc.mp4"),
            Path::new("/tmp/abc.mp4.processed"),
        );
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "-v",
                "error",
                "-i",
                "/tmp/abc.mp4",
                "-movflags",
                "faststart",
                "-map_metadata",
                "0",
                "-codec",
                "copy",
                "-f",
                "mp4",
                "-y",
                "/tmp/abc.mp4.processed"
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_remux_failure_without_paths() {
        use crate::test_helpers::write_stub_tool;

        let dir = tempfile::tempdir().unwrap();
        let tool = write_stub_tool(
            dir.path(),
            "ffmpeg-stub",
            "echo \"failed to remux: $*\" >&2\nexit 1",
        );
        let input = dir.path().join("upload-token.mp4");
        tokio::fs::write(&input, b"junk").await.unwrap();

        let transcoder = FfmpegTranscoder::new(tool.to_string_lossy()).unwrap();
        match transcoder.fast_start(&input).await {
            Err(IngestError::RemuxFailed(message)) => {
                assert!(message.starts_with("failed to remux: -v error -i <video>"));
                assert!(message.ends_with("-y <video>"));
                assert!(!message.contains("upload-token"));
            }
            other => panic!("expected RemuxFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_run_returns_output_path() {
        use crate::test_helpers::write_stub_tool;

        let dir = tempfile::tempdir().unwrap();
        let tool = write_stub_tool(
            dir.path(),
            "ffmpeg-stub",
            "for last; do :; done\ncp \"$4\" \"$last\"",
        );
        let input = dir.path().join("upload.mp4");
        tokio::fs::write(&input, b"mp4 bytes").await.unwrap();

        let transcoder = FfmpegTranscoder::new(tool.to_string_lossy()).unwrap();
        let output = transcoder.fast_start(&input).await.unwrap();
        assert_eq!(output, faststart_output_path(&input));
        assert_eq!(tokio::fs::read(&output).await.unwrap(), b"mp4 bytes");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancelled_remux_kills_the_tool() {
        use crate::test_helpers::write_stub_tool;

        let dir = tempfile::tempdir().unwrap();
        let tool = write_stub_tool(
            dir.path(),
            "ffmpeg-stub",
            "sleep 1\nfor last; do :; done\necho partial > \"$last\"",
        );
        let input = dir.path().join("upload.mp4");
        tokio::fs::write(&input, b"mp4 bytes").await.unwrap();

        let transcoder = FfmpegTranscoder::new(tool.to_string_lossy()).unwrap();
        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(200),
            transcoder.fast_start(&input),
        )
        .await;
        assert!(outcome.is_err());

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert!(!faststart_output_path(&input).exists());
    }

    #[tokio::test]
    async fn missing_binary_is_remux_failure() {
        let transcoder = FfmpegTranscoder::new("/nonexistent/bin/ffmpeg").unwrap();
        let err = transcoder
            .fast_start(Path::new("/tmp/abc.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::RemuxFailed(_)));
    }
}
