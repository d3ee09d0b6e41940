use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::ValidationError;

/// Uploads at or above this size are rejected.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const SUPPORTED_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
    "image/gif",
];

/// The currently selected, validated image. Replaced wholesale on each new
/// selection; an instance existing at all means validation passed.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub size_bytes: usize,
    pub preview: String,
}

/// Validate a selected file and build its preview data URI. Picker and
/// drag-and-drop selections both land here.
pub fn submit_file(bytes: Vec<u8>, declared_type: &str) -> Result<UploadCandidate, ValidationError> {
    let mime_type = declared_type.trim().to_ascii_lowercase();
    if !SUPPORTED_TYPES.contains(&mime_type.as_str()) {
        return Err(ValidationError::UnsupportedType(declared_type.to_string()));
    }
    if bytes.len() >= MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge(bytes.len() as u64));
    }

    let preview = format!("data:{};base64,{}", mime_type, STANDARD.encode(&bytes));
    Ok(UploadCandidate {
        size_bytes: bytes.len(),
        mime_type,
        preview,
        bytes,
    })
}
