//! Tubely Core Library
//!
//! This crate provides the domain models, error types and configuration shared
//! by the storage, processing and CLI crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, IngestSettings, StorageConfig};
pub use error::{ErrorMetadata, IngestError, IngestResult, LogLevel};
pub use models::{FilePart, FormField, FormValue, UploadBody, UploadRequest, VideoRecord};
pub use storage_types::StorageBackend;
