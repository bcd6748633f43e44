pub mod upload;
pub mod video;

pub use upload::{FilePart, FormField, FormValue, UploadBody, UploadRequest};
pub use video::VideoRecord;
