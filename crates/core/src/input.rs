//! Request payload decoding.
//!
//! Images arrive as base64 text, optionally wrapped in a data URI and broken
//! across lines. An empty payload is not an error: it means "no image".

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, RgbImage};

use crate::error::{OcrError, Result};

const BASE64_MARKER: &str = "base64,";

/// Decodes a base64 payload into raw bytes.
///
/// Everything up to and including the first `base64,` marker is dropped, as
/// are all whitespace characters. Returns `Ok(None)` when nothing is left.
pub fn decode_base64_payload(payload: &[u8]) -> Result<Option<Vec<u8>>> {
    let text = String::from_utf8_lossy(payload);
    let body = match text.find(BASE64_MARKER) {
        Some(pos) => &text[pos + BASE64_MARKER.len()..],
        None => &text[..],
    };
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(None);
    }

    STANDARD
        .decode(compact.as_bytes())
        .map(Some)
        .map_err(|e| OcrError::Base64(e.to_string()))
}

/// Decodes image bytes into an RGB image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    let image: DynamicImage = image::load_from_memory(bytes)?;
    Ok(image.to_rgb8())
}
