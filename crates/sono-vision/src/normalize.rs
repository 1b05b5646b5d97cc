//! Image decoding and canonical JPEG re-encoding.

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::ImageFormat;

use crate::types::{ImageBuffer, Result, VisionError};

/// MIME type of the canonical transport encoding.
pub const CANONICAL_MIME: &str = "image/jpeg";

/// Largest width or height a baseline JPEG can carry.
pub const MAX_JPEG_DIMENSION: u32 = 65535;

const DATA_URL_MARKER: &str = "base64,";

/// Where an uploaded image came from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Raw file bytes from a multipart upload.
    Raw(Vec<u8>),
    /// Base64 text, optionally prefixed with a data-URL header.
    Base64(String),
}

/// Decode an image from either source form into an RGB buffer.
pub fn decode(source: ImageSource) -> Result<ImageBuffer> {
    match source {
        ImageSource::Raw(bytes) => decode_bytes(&bytes),
        ImageSource::Base64(text) => decode_base64(&text),
    }
}

/// Decode PNG or JPEG bytes. Any other format is rejected.
pub fn decode_bytes(bytes: &[u8]) -> Result<ImageBuffer> {
    if bytes.is_empty() {
        return Err(VisionError::Decode("empty image data".to_string()));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| VisionError::Decode("unrecognized image data".to_string()))?;

    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(VisionError::Decode(format!(
            "unsupported format {format:?}, expected PNG or JPEG"
        )));
    }

    let img = image::load_from_memory_with_format(bytes, format)?;
    let (width, height) = (img.width(), img.height());
    if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
        return Err(VisionError::Decode(format!(
            "image dimensions {width}x{height} exceed JPEG limits"
        )));
    }

    Ok(ImageBuffer::from_rgb(img.into_rgb8()))
}

/// Decode a base64 string, tolerating a `data:<mime>;base64,` header and
/// embedded whitespace.
pub fn decode_base64(text: &str) -> Result<ImageBuffer> {
    let payload: String = strip_data_url(text)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| VisionError::Decode(format!("invalid base64: {e}")))?;

    decode_bytes(&bytes)
}

/// Drop everything up to and including the first `base64,` marker.
pub fn strip_data_url(text: &str) -> &str {
    match text.find(DATA_URL_MARKER) {
        Some(idx) => &text[idx + DATA_URL_MARKER.len()..],
        None => text,
    }
}

/// Re-encode a buffer as JPEG at the encoder's default quality.
pub fn encode_jpeg(buffer: &ImageBuffer) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new(&mut buf);
    buffer
        .as_rgb()
        .write_with_encoder(encoder)
        .map_err(|e| VisionError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Canonical transport form: a JPEG data URL.
pub fn to_data_url(buffer: &ImageBuffer) -> Result<String> {
    let jpeg = encode_jpeg(buffer)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(jpeg);
    Ok(format!("data:{CANONICAL_MIME};base64,{encoded}"))
}
