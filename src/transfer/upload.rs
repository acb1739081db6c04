//! Typed validation of the upload request body.

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeError, Engine as _};
use serde::Deserialize;

/// A structurally valid upload request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// The file name chosen in the browser
    pub file_name: String,
    /// The file content, base64-encoded
    pub file_data: String,
}

impl UploadRequest {
    /// Decode the base64 payload into raw file bytes.
    pub fn decode_bytes(&self) -> Result<Vec<u8>, DecodeError> {
        STANDARD.decode(&self.file_data)
    }
}

/// The outcome of validating an upload body, decided before any file-system
/// side effect is attempted.
#[derive(Debug)]
pub enum UploadParse {
    Valid(UploadRequest),
    /// Syntactically valid JSON that lacks `fileName` or `fileData`.
    MissingFields,
    /// Not JSON at all.
    Malformed(serde_json::Error),
}

/// Classify an upload body.
///
/// The body is parsed as JSON first and shape-checked second, so a client
/// sending garbage is distinguished from one sending an incomplete object.
pub fn classify_upload(body: &str) -> UploadParse {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => return UploadParse::Malformed(e),
    };

    match serde_json::from_value::<UploadRequest>(value) {
        Ok(request) => UploadParse::Valid(request),
        Err(_) => UploadParse::MissingFields,
    }
}
