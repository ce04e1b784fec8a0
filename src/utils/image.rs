//! Utility functions for loading images.
//!
//! Uploaded bytes and files on disk go through the same decoder so the web
//! host and the command line see identical pixels.

use crate::core::errors::{PredictError, PredictResult};
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Decodes an in-memory image, guessing the format from its contents.
///
/// # Errors
///
/// Returns [`PredictError::ImageLoad`] when the bytes are not a supported
/// image, and [`PredictError::InvalidInput`] when `bytes` is empty.
pub fn decode_image(bytes: &[u8]) -> PredictResult<DynamicImage> {
    if bytes.is_empty() {
        return Err(PredictError::invalid_input("image payload is empty"));
    }
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    reader.decode().map_err(PredictError::ImageLoad)
}

/// Loads an image from a file path.
///
/// # Errors
///
/// Returns [`PredictError::ImageLoad`] if the file cannot be opened or decoded.
pub fn load_image(path: &Path) -> PredictResult<DynamicImage> {
    image::open(path).map_err(PredictError::ImageLoad)
}
