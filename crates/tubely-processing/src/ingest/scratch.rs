//! Per-ingestion scratch directory.
//!
//! Every temporary artifact of one ingestion (the buffered upload and the
//! remuxed copy) lives in a single `TempDir` under the configured temp
//! directory. The directory is removed on every exit path: explicitly with
//! [`ScratchDir::close`], or on drop when the pipeline stops early or the
//! ingestion future is cancelled. Removal failures are logged and never
//! returned.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::fs::{File, OpenOptions};

const SCRATCH_PREFIX: &str = "tubely-ingest-";

#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    /// Create a fresh, uniquely named directory inside `parent`.
    pub fn create_in(parent: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(parent)?;
        let path = dir.path().to_path_buf();
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a new, empty file called `name` inside the directory. Fails if
    /// it already exists.
    pub async fn create_file(&self, name: &str) -> io::Result<(PathBuf, File)> {
        let path = self.path.join(name);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        Ok((path, file))
    }

    /// Remove the directory and everything in it now.
    pub fn close(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => {
                    tracing::debug!(path = %self.path.display(), "Removed scratch directory")
                }
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove scratch directory"
                ),
            }
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn close_removes_directory_and_contents() {
        let parent = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::create_in(parent.path()).unwrap();
        let (path, mut file) = scratch.create_file("a.mp4").await.unwrap();
        file.write_all(b"data").await.unwrap();
        drop(file);
        tokio::fs::write(scratch.path().join("a.mp4.processed"), b"more")
            .await
            .unwrap();

        assert!(path.exists());
        let dir = scratch.path().to_path_buf();
        scratch.close();
        assert!(!dir.exists());
        assert_eq!(std::fs::read_dir(parent.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn drop_removes_directory() {
        let parent = tempfile::tempdir().unwrap();
        let dir = {
            let scratch = ScratchDir::create_in(parent.path()).unwrap();
            scratch.create_file("a.mp4").await.unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn create_file_refuses_existing_file() {
        let parent = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::create_in(parent.path()).unwrap();
        scratch.create_file("a.mp4").await.unwrap();

        let err = scratch.create_file("a.mp4").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn directories_are_unique_and_prefixed() {
        let parent = tempfile::tempdir().unwrap();
        let a = ScratchDir::create_in(parent.path()).unwrap();
        let b = ScratchDir::create_in(parent.path()).unwrap();
        assert_ne!(a.path(), b.path());
        let name = a.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(SCRATCH_PREFIX));
    }

    #[test]
    fn missing_parent_is_an_error() {
        let parent = tempfile::tempdir().unwrap();
        assert!(ScratchDir::create_in(&parent.path().join("absent")).is_err());
    }
}
