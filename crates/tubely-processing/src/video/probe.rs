//! ffprobe wrapper - stream geometry extraction

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tubely_core::{IngestError, IngestResult};

use super::tool::{scrub_diagnostics, validate_tool_path};
use super::traits::MediaInspector;
use crate::metadata::StreamGeometry;

/// Shape of `ffprobe -show_entries stream=width,height -of json`.
/// Other top-level keys (`programs`, `stream_groups`) are ignored.
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: u32,
    height: u32,
}

/// Parse ffprobe's JSON output into the geometry of the first stream.
pub fn parse_probe_output(stdout: &[u8]) -> IngestResult<StreamGeometry> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| IngestError::ProbeFailed(format!("unexpected ffprobe output: {}", e)))?;

    let stream = output
        .streams
        .first()
        .ok_or_else(|| IngestError::ProbeFailed("no video stream found".to_string()))?;

    StreamGeometry::new(stream.width, stream.height).ok_or_else(|| {
        IngestError::ProbeFailed(format!(
            "video stream has zero dimension: {}x{}",
            stream.width, stream.height
        ))
    })
}

pub struct FfprobeInspector {
    ffprobe_path: String,
}

impl FfprobeInspector {
    pub fn new(ffprobe_path: impl Into<String>) -> Result<Self> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path).context("Invalid ffprobe_path")?;
        Ok(Self { ffprobe_path })
    }

    /// Arguments selecting only the first video stream's width and height.
    fn args(path: &Path) -> Vec<std::ffi::OsString> {
        let mut args: Vec<std::ffi::OsString> = [
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "json",
        ]
        .into_iter()
        .map(std::ffi::OsString::from)
        .collect();
        args.push(path.as_os_str().to_owned());
        args
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn probe_path(&self, path: &Path) -> IngestResult<StreamGeometry> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(Self::args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| IngestError::ProbeFailed(format!("failed to execute ffprobe: {}", e)))?;

        if !output.status.success() {
            let diagnostics = scrub_diagnostics(&output.stderr, &[path]);
            tracing::warn!(
                exit_code = ?output.status.code(),
                diagnostics = %diagnostics,
                "ffprobe exited with failure"
            );
            return Err(IngestError::ProbeFailed(diagnostics));
        }

        let geometry = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = geometry.width,
            height = geometry.height,
            "Video probe completed"
        );

        Ok(geometry)
    }
}

#[async_trait]
impl MediaInspector for FfprobeInspector {
    async fn probe(&self, path: &Path) -> IngestResult<StreamGeometry> {
        self.probe_path(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_probe_failed(result: IngestResult<StreamGeometry>) {
        match result {
            Err(IngestError::ProbeFailed(_)) => {}
            other => panic!("expected ProbeFailed, got {:?}", other),
        }
    }

    #[test]
    fn parses_first_stream() {
        let stdout = br#"{
            "programs": [],
            "stream_groups": [],
            "streams": [{"width": 1280, "height": 720}, {"width": 640, "height": 360}]
        }"#;
        assert_eq!(
            parse_probe_output(stdout).unwrap(),
            StreamGeometry {
                width: 1280,
                height: 720
            }
        );
    }

    #[test]
    fn no_streams_is_probe_failure() {
        assert_probe_failed(parse_probe_output(br#"{"programs": [], "streams": []}"#));
    }

    #[test]
    fn schema_deviations_are_probe_failures() {
        assert_probe_failed(parse_probe_output(b"not json"));
        assert_probe_failed(parse_probe_output(br#"{"programs": []}"#));
        assert_probe_failed(parse_probe_output(br#"{"streams": [{"width": 1280}]}"#));
        assert_probe_failed(parse_probe_output(
            br#"{"streams": [{"width": "1280", "height": 720}]}"#,
        ));
        assert_probe_failed(parse_probe_output(
            br#"{"streams": [{"width": -1, "height": 720}]}"#,
        ));
        assert_probe_failed(parse_probe_output(
            br#"{"streams": [{"width": 1280, "height": 0}]}"#,
        ));
    }

    #[test]
    fn args_select_first_video_stream() {
        let args = FfprobeInspector::args(Path::new("/tmp/x.mp4"));
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height",
                "-of",
                "json",
                "/tmp/x.mp4"
            ]
        );
    }

    #[tokio::test]
    async fn missing_binary_is_probe_failure() {
        let inspector = FfprobeInspector::new("/nonexistent/bin/ffprobe").unwrap();
        assert_probe_failed(inspector.probe(Path::new("/tmp/x.mp4")).await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_probe_failure_without_paths() {
        use crate::test_helpers::write_stub_tool;

        let dir = tempfile::tempdir().unwrap();
        let tool = write_stub_tool(
            dir.path(),
            "ffprobe-stub",
            "for last; do :; done\n\
             echo \"$last: Invalid data found when processing input\" >&2\n\
             exit 1",
        );
        let input = dir.path().join("upload-token.mp4");
        tokio::fs::write(&input, b"junk").await.unwrap();

        let inspector = FfprobeInspector::new(tool.to_string_lossy()).unwrap();
        match inspector.probe(&input).await {
            Err(IngestError::ProbeFailed(message)) => {
                assert_eq!(message, "<video>: Invalid data found when processing input");
            }
            other => panic!("expected ProbeFailed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_run_parses_stdout() {
        use crate::test_helpers::write_stub_tool;

        let dir = tempfile::tempdir().unwrap();
        let tool = write_stub_tool(
            dir.path(),
            "ffprobe-stub",
            r#"echo '{"programs": [], "streams": [{"width": 720, "height": 1280}]}'"#,
        );
        let input = dir.path().join("upload.mp4");
        tokio::fs::write(&input, b"mp4").await.unwrap();

        let inspector = FfprobeInspector::new(tool.to_string_lossy()).unwrap();
        let geometry = inspector.probe(&input).await.unwrap();
        assert_eq!((geometry.width, geometry.height), (720, 1280));
    }

    #[test]
    fn rejects_unsafe_binary_path() {
        assert!(FfprobeInspector::new("ffprobe; rm -rf /").is_err());
    }
}
