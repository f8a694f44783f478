//! Upload validation.
//!
//! Two independent checks, first failure wins: content must sniff as
//! JPEG, PNG, or WebP, and must not exceed the size limit. Format is
//! detected from the bytes, never from the file name.

use image::ImageFormat;
use thiserror::Error;

/// Maximum accepted upload size.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unsupported image type: expected JPEG, PNG, or WebP")]
    UnsupportedType,
    #[error("file too large: {size} bytes exceeds the {MAX_UPLOAD_BYTES}-byte limit")]
    TooLarge { size: usize },
}

/// Validate upload bytes, returning the sniffed format on success.
pub fn validate_upload(bytes: &[u8]) -> Result<ImageFormat, ValidationError> {
    let format =
        image::guess_format(bytes).map_err(|_| ValidationError::UnsupportedType)?;
    if !matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP
    ) {
        return Err(ValidationError::UnsupportedType);
    }

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge { size: bytes.len() });
    }

    Ok(format)
}
