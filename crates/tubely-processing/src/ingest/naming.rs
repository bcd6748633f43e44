//! Random video filenames and the storage keys derived from them.

use std::fmt::{Display, Formatter, Result as FmtResult};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use tubely_core::constants::{FILENAME_RANDOM_BYTES, VIDEO_FILE_EXTENSION};

use crate::video::Orientation;

/// `{base64url(32 random bytes)}.mp4`
///
/// The same filename names the raw temporary artifact and the published
/// object, so both can be correlated from logs. It is not a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFilename(String);

impl VideoFilename {
    pub fn random() -> Self {
        let bytes: [u8; FILENAME_RANDOM_BYTES] = rand::random();
        VideoFilename(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(bytes),
            VIDEO_FILE_EXTENSION
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VideoFilename {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// `{orientation}/{filename}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(orientation: Orientation, filename: &VideoFilename) -> Self {
        StorageKey(format!("{}/{}", orientation.as_str(), filename.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
