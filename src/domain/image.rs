// Uploaded image model
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AcquisitionError {
    #[error("image upload is empty")]
    Empty,
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),
}

/// Raw image bytes together with the MIME type they were uploaded with.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl ImageUpload {
    /// Accept an upload, normalizing the MIME type (`"Image/PNG; q=1"` -> `"image/png"`).
    pub fn new(bytes: impl Into<Bytes>, mime_type: &str) -> Result<Self, AcquisitionError> {
        let bytes = bytes.into();
        let mime_type = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if !mime_type.starts_with("image/") || mime_type.len() == "image/".len() {
            return Err(AcquisitionError::UnsupportedType(mime_type));
        }
        if bytes.is_empty() {
            return Err(AcquisitionError::Empty);
        }

        Ok(Self { bytes, mime_type })
    }

    pub fn base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }
}
