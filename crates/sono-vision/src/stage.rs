//! Scan-flow stages and their legal transitions.
//!
//! A scan session starts waiting for an image, identifies the target organ,
//! then either diagnoses it (and opens a follow-up chat) or guides the
//! operator to reposition the probe and upload again.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Result, VisionError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    AwaitingImage,
    Identify,
    Describe,
    Navigate,
    Chat,
    WaitForNewImage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StageEvent {
    ImageReceived,
    Identified { found: bool },
    Described,
    Guided,
    Reset,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::AwaitingImage => "awaiting_image",
            Stage::Identify => "identify",
            Stage::Describe => "describe",
            Stage::Navigate => "navigate",
            Stage::Chat => "chat",
            Stage::WaitForNewImage => "wait_for_new_image",
        }
    }

    /// Next stage for `event`, or `None` if the pair is not in the table.
    pub fn next(self, event: StageEvent) -> Option<Stage> {
        use Stage::*;
        use StageEvent::*;
        match (self, event) {
            (_, Reset) => Some(AwaitingImage),
            (AwaitingImage | WaitForNewImage, ImageReceived) => Some(Identify),
            (Identify, Identified { found: true }) => Some(Describe),
            (Identify, Identified { found: false }) => Some(Navigate),
            (Describe, Described) => Some(Chat),
            (Navigate, Guided) => Some(WaitForNewImage),
            _ => None,
        }
    }

    pub fn advance(self, event: StageEvent) -> Result<Stage> {
        self.next(event).ok_or_else(|| VisionError::InvalidTransition {
            from: self.to_string(),
            event: event.to_string(),
        })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageEvent::ImageReceived => f.write_str("image_received"),
            StageEvent::Identified { found } => write!(f, "identified(found={found})"),
            StageEvent::Described => f.write_str("described"),
            StageEvent::Guided => f.write_str("guided"),
            StageEvent::Reset => f.write_str("reset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_path_ends_in_chat() {
        let stage = Stage::default()
            .advance(StageEvent::ImageReceived)
            .and_then(|s| s.advance(StageEvent::Identified { found: true }))
            .and_then(|s| s.advance(StageEvent::Described))
            .unwrap();
        assert_eq!(stage, Stage::Chat);
    }

    #[test]
    fn test_not_found_path_loops_back_to_identify() {
        let stage = Stage::Identify
            .advance(StageEvent::Identified { found: false })
            .and_then(|s| s.advance(StageEvent::Guided))
            .unwrap();
        assert_eq!(stage, Stage::WaitForNewImage);
        assert_eq!(stage.advance(StageEvent::ImageReceived).unwrap(), Stage::Identify);
    }

    #[test]
    fn test_describe_before_identify_is_rejected() {
        let err = Stage::AwaitingImage.advance(StageEvent::Described).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid stage transition: described is not allowed in stage awaiting_image"
        );
        assert!(Stage::Chat.next(StageEvent::ImageReceived).is_none());
        assert!(Stage::Navigate.next(StageEvent::Described).is_none());
    }

    #[test]
    fn test_reset_from_anywhere() {
        for stage in [
            Stage::AwaitingImage,
            Stage::Identify,
            Stage::Describe,
            Stage::Navigate,
            Stage::Chat,
            Stage::WaitForNewImage,
        ] {
            assert_eq!(stage.advance(StageEvent::Reset).unwrap(), Stage::AwaitingImage);
        }
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Stage::WaitForNewImage).unwrap(),
            serde_json::json!("wait_for_new_image")
        );
        assert_eq!(Stage::AwaitingImage.to_string(), "awaiting_image");
    }
}
