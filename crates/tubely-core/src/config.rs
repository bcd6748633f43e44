//! Configuration module
//!
//! Configuration is read from the environment (optionally seeded from a `.env`
//! file). `IngestSettings` holds what the ingestion pipeline needs and
//! `StorageConfig` what the storage factory needs.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context};

use crate::constants::{DEFAULT_MAX_VIDEO_SIZE_BYTES, VIDEO_MP4_CONTENT_TYPE};
use crate::storage_types::StorageBackend;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Settings consumed by the ingestion pipeline.
#[derive(Clone, Debug)]
pub struct IngestSettings {
    /// Directory temporary artifacts are written to.
    pub temp_dir: PathBuf,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub max_video_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            temp_dir: env::temp_dir(),
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            max_video_size_bytes: DEFAULT_MAX_VIDEO_SIZE_BYTES,
            allowed_content_types: vec![VIDEO_MP4_CONTENT_TYPE.to_string()],
        }
    }
}

impl IngestSettings {
    pub fn is_allowed_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types.iter().any(|t| t == content_type)
    }
}

/// Object storage configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub s3_cdn_url: Option<String>,  // Distribution base used for public URLs when set
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub ingest: IngestSettings,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = non_empty("ENVIRONMENT")
            .or_else(|| non_empty("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let defaults = IngestSettings::default();

        let max_video_size_bytes = match non_empty("MAX_VIDEO_SIZE_MB") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("MAX_VIDEO_SIZE_MB is not a number: {}", raw))?
                .saturating_mul(BYTES_PER_MB),
            None => defaults.max_video_size_bytes,
        };

        let allowed_content_types = non_empty("VIDEO_ALLOWED_CONTENT_TYPES")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_content_types);

        let ingest = IngestSettings {
            temp_dir: non_empty("TUBELY_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
            ffprobe_path: non_empty("FFPROBE_PATH").unwrap_or(defaults.ffprobe_path),
            ffmpeg_path: non_empty("FFMPEG_PATH").unwrap_or(defaults.ffmpeg_path),
            max_video_size_bytes,
            allowed_content_types,
        };

        let backend = match non_empty("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let storage = StorageConfig {
            backend,
            s3_bucket: non_empty("S3_BUCKET"),
            s3_region: non_empty("S3_REGION").or_else(|| non_empty("AWS_REGION")),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            s3_cdn_url: non_empty("S3_CDN_URL"),
            local_storage_path: non_empty("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty("LOCAL_STORAGE_BASE_URL"),
        };

        Ok(Config {
            environment,
            ingest,
            storage,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.ingest.max_video_size_bytes == 0 {
            return Err(anyhow!("MAX_VIDEO_SIZE_MB must be greater than zero"));
        }
        if self.ingest.allowed_content_types.is_empty() {
            return Err(anyhow!("VIDEO_ALLOWED_CONTENT_TYPES must not be empty"));
        }
        validate_executable_path(&self.ingest.ffprobe_path).context("Invalid FFPROBE_PATH")?;
        validate_executable_path(&self.ingest.ffmpeg_path).context("Invalid FFMPEG_PATH")?;

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.s3_bucket.is_none() {
                    return Err(anyhow!("S3_BUCKET is required for the s3 storage backend"));
                }
                if self.storage.s3_region.is_none() {
                    return Err(anyhow!(
                        "S3_REGION or AWS_REGION is required for the s3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_none() {
                    return Err(anyhow!(
                        "LOCAL_STORAGE_PATH is required for the local storage backend"
                    ));
                }
                if self.storage.local_storage_base_url.is_none() {
                    return Err(anyhow!(
                        "LOCAL_STORAGE_BASE_URL is required for the local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Reject executable paths that contain shell metacharacters or traversal.
pub fn validate_executable_path(path: &str) -> Result<(), anyhow::Error> {
    const DANGEROUS_CHARS: [char; 11] = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];

    if path.trim().is_empty() {
        return Err(anyhow!("Executable path is empty"));
    }
    if path.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        return Err(anyhow!("Path contains dangerous characters: {}", path));
    }
    if path.contains("..") {
        return Err(anyhow!("Path contains directory traversal: {}", path));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_ingestion_contract() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.environment, "development");
        assert_eq!(config.ingest.max_video_size_bytes, 1 << 30);
        assert_eq!(config.ingest.allowed_content_types, vec!["video/mp4"]);
        assert_eq!(config.ingest.ffprobe_path, "ffprobe");
        assert_eq!(config.storage.backend, StorageBackend::S3);
        assert!(config.ingest.is_allowed_content_type("video/mp4"));
        assert!(!config.ingest.is_allowed_content_type("video/webm"));
    }

    #[test]
    fn region_falls_back_to_aws_region() {
        let config = config_from(&[("S3_BUCKET", "tubely"), ("AWS_REGION", "us-east-1")]).unwrap();
        assert_eq!(config.storage.s3_region.as_deref(), Some("us-east-1"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn size_is_read_in_megabytes() {
        let config = config_from(&[("MAX_VIDEO_SIZE_MB", "10")]).unwrap();
        assert_eq!(config.ingest.max_video_size_bytes, 10 * 1024 * 1024);
        assert!(config_from(&[("MAX_VIDEO_SIZE_MB", "ten")]).is_err());
    }

    #[test]
    fn validate_requires_backend_settings() {
        let config = config_from(&[("STORAGE_BACKEND", "local")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/var/lib/tubely"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:8091/assets"),
        ])
        .unwrap();
        assert!(config.validate().is_ok());

        let config = config_from(&[("S3_REGION", "us-east-1")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unsafe_tool_paths() {
        let config = config_from(&[
            ("S3_BUCKET", "tubely"),
            ("S3_REGION", "us-east-1"),
            ("FFMPEG_PATH", "ffmpeg; rm -rf /"),
        ])
        .unwrap();
        assert!(config.validate().is_err());
        assert!(validate_executable_path("/usr/bin/ffprobe").is_ok());
        assert!(validate_executable_path("../ffprobe").is_err());
    }
}
