//! Transient upload request types.
//!
//! An `UploadRequest` mirrors a parsed multipart form: a list of named fields,
//! each either text or a file part with a byte stream. It lives for a single
//! ingestion call.

use std::fmt;
use std::pin::Pin;

use tokio::io::AsyncRead;
use uuid::Uuid;

/// Byte source of an uploaded file.
pub type UploadBody = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// An uploaded file as declared by the client.
pub struct FilePart {
    pub filename: Option<String>,
    pub content_type: String,
    pub size: u64,
    pub content: UploadBody,
}

impl FilePart {
    pub fn new(content_type: impl Into<String>, size: u64, content: UploadBody) -> Self {
        Self {
            filename: None,
            content_type: content_type.into(),
            size,
            content,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum FormValue {
    Text(String),
    File(FilePart),
}

#[derive(Debug)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

impl FormField {
    pub fn file(name: impl Into<String>, part: FilePart) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File(part),
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }
}

#[derive(Debug)]
pub struct UploadRequest {
    pub video_id: Uuid,
    pub fields: Vec<FormField>,
}

impl UploadRequest {
    pub fn new(video_id: Uuid, fields: Vec<FormField>) -> Self {
        Self { video_id, fields }
    }

    /// Remove and return the value of the first field called `name`.
    pub fn take_field(&mut self, name: &str) -> Option<FormValue> {
        let index = self.fields.iter().position(|field| field.name == name)?;
        Some(self.fields.swap_remove(index).value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_body() -> UploadBody {
        Box::pin(tokio::io::empty())
    }

    #[test]
    fn take_field_returns_first_match() {
        let mut request = UploadRequest::new(
            Uuid::new_v4(),
            vec![
                FormField::text("title", "hello"),
                FormField::file("video", FilePart::new("video/mp4", 0, empty_body())),
            ],
        );

        match request.take_field("video") {
            Some(FormValue::File(part)) => assert_eq!(part.content_type, "video/mp4"),
            other => panic!("unexpected field: {:?}", other),
        }
        assert!(request.take_field("video").is_none());
        assert_eq!(request.fields.len(), 1);
    }
}
