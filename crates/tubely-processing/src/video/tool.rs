//! Helpers shared by the ffprobe and ffmpeg wrappers.

use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// Placeholder substituted for artifact paths in tool diagnostics.
pub const REDACTED_PATH: &str = "<video>";

/// Validate a configured tool path before it is ever executed.
pub fn validate_tool_path(tool_path: &str) -> Result<()> {
    tubely_core::config::validate_executable_path(tool_path)
        .context("Invalid tool path: contains dangerous characters")?;

    if !tool_path.chars().all(|c| {
        c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\'
    }) {
        return Err(anyhow!("Invalid tool path: contains unsafe characters"));
    }

    Ok(())
}

/// Turn a tool's stderr into a diagnostic safe to hand to clients: paths of
/// the artifacts involved are replaced and surrounding whitespace trimmed.
pub fn scrub_diagnostics(stderr: &[u8], paths: &[&Path]) -> String {
    let mut shown: Vec<String> = paths
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    // Longest first so a path that prefixes another is not replaced early.
    shown.sort_by_key(|p| std::cmp::Reverse(p.len()));

    let mut text = String::from_utf8_lossy(stderr).trim().to_string();
    for path in &shown {
        text = text.replace(path.as_str(), REDACTED_PATH);
    }
    if text.is_empty() {
        "no diagnostic output".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrubs_every_artifact_path() {
        let input = Path::new("/tmp/abc.mp4");
        let output = Path::new("/tmp/abc.mp4.processed");
        let stderr = b"/tmp/abc.mp4: moov atom not found\nCould not write /tmp/abc.mp4.processed\n";

        let text = scrub_diagnostics(stderr, &[input, output]);
        assert_eq!(text, "<video>: moov atom not found\nCould not write <video>");
        assert!(!text.contains("/tmp"));
    }

    #[test]
    fn empty_stderr_gets_placeholder() {
        assert_eq!(scrub_diagnostics(b"  \n", &[]), "no diagnostic output");
    }

    #[test]
    fn tool_paths_are_validated() {
        assert!(validate_tool_path("ffprobe").is_ok());
        assert!(validate_tool_path("/usr/local/bin/ffmpeg").is_ok());
        assert!(validate_tool_path("ffmpeg && curl evil").is_err());
        assert!(validate_tool_path("ff mpeg").is_err());
    }
}
