//! Tubely Storage Library
//!
//! This crate provides the storage abstraction used to publish processed
//! videos, with implementations for S3 (through `object_store`) and the local
//! filesystem.
//!
//! # Storage key format
//!
//! Keys are chosen by the caller (the ingestion pipeline uses
//! `{orientation}/{filename}.mp4`). Keys must not contain `..` or a leading
//! `/`; every backend validates them through the `keys` module.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;
pub mod url;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
pub use url::PublicUrlBase;
