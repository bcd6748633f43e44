//! Video processing module

pub mod faststart;
pub mod orientation;
pub mod probe;
pub mod tool;
pub mod traits;

pub use faststart::{faststart_output_path, FfmpegTranscoder};
pub use orientation::Orientation;
pub use probe::FfprobeInspector;
pub use traits::{MediaInspector, MediaTranscoder};
