//! Video ingestion: validate → buffer → probe → remux → publish.

pub mod naming;
pub mod orchestrator;
pub mod scratch;

pub use naming::{StorageKey, VideoFilename};
pub use orchestrator::VideoIngestor;
pub use scratch::ScratchDir;
