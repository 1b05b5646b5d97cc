//! Core data types for decoded scans, model answers, and errors.

use image::RgbImage;
use serde::{Deserialize, Serialize};

/// A decoded image in RGB channel order, 8 bits per channel.
///
/// Buffers live for a single request. They are never sent to the model
/// directly; see [`crate::query::VisionQuery`] for the canonical re-encode.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pixels: RgbImage,
}

impl ImageBuffer {
    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Yes/no identification of a named entity.
///
/// Free-text answers (diagnosis, navigation) are plain `String`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionResult {
    pub found: bool,
    pub entity: String,
}

impl VisionResult {
    pub fn identification(found: bool, entity: impl Into<String>) -> Self {
        Self {
            found,
            entity: entity.into(),
        }
    }
}

/// Errors that can occur in the vision library.
#[derive(thiserror::Error, Debug)]
pub enum VisionError {
    #[error("Invalid image format: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Invalid stage transition: {event} is not allowed in stage {from}")]
    InvalidTransition { from: String, event: String },
}

impl VisionError {
    /// Whether the error originated at the external inference service.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            VisionError::Transport(_)
                | VisionError::Provider { .. }
                | VisionError::MalformedResponse(_)
        )
    }
}

impl From<image::ImageError> for VisionError {
    fn from(e: image::ImageError) -> Self {
        VisionError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for VisionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            VisionError::MalformedResponse(e.to_string())
        } else {
            VisionError::Transport(e.to_string())
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, VisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identification_serializes_flat() {
        let value = serde_json::to_value(VisionResult::identification(false, "heart")).unwrap();
        assert_eq!(value, serde_json::json!({"found": false, "entity": "heart"}));
    }

    #[test]
    fn test_external_classification() {
        assert!(VisionError::Transport("timeout".into()).is_external());
        assert!(VisionError::Provider {
            status: 503,
            body: String::new()
        }
        .is_external());
        assert!(VisionError::MalformedResponse("no choices".into()).is_external());
        assert!(!VisionError::Decode("bad".into()).is_external());
        assert!(!VisionError::Encode("bad".into()).is_external());
    }
}
