//! Single-turn request bundle sent to the vision model.

use crate::normalize::to_data_url;
use crate::types::{ImageBuffer, Result};

/// Output budget for yes/no identification.
pub const IDENTIFY_MAX_TOKENS: u32 = 10;

/// Output budget for diagnostic and navigation text.
pub const DESCRIBE_MAX_TOKENS: u32 = 4096;

/// Instruction text plus the canonical image payload.
///
/// Constructing a query performs the JPEG re-encode, so the decoded buffer
/// never reaches the wire as-is.
#[derive(Debug, Clone)]
pub struct VisionQuery {
    instruction: String,
    image_data_url: String,
    max_tokens: u32,
}

impl VisionQuery {
    pub fn new(instruction: impl Into<String>, image: &ImageBuffer, max_tokens: u32) -> Result<Self> {
        Ok(Self {
            instruction: instruction.into(),
            image_data_url: to_data_url(image)?,
            max_tokens,
        })
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// `data:image/jpeg;base64,...`
    pub fn image_data_url(&self) -> &str {
        &self.image_data_url
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
