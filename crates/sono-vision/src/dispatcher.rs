//! Vision query dispatch: build one query, send it, interpret the answer.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::prompts;
use crate::provider::VisionProvider;
use crate::query::{VisionQuery, DESCRIBE_MAX_TOKENS, IDENTIFY_MAX_TOKENS};
use crate::types::{ImageBuffer, Result, VisionError};

/// What to do when the external service fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Answer with a fixed fallback (`false` or placeholder text).
    #[default]
    Degrade,
    /// Return the error so callers can tell "absent" from "unavailable".
    Propagate,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "degrade" => Ok(FailurePolicy::Degrade),
            "propagate" => Ok(FailurePolicy::Propagate),
            other => Err(format!("unknown failure policy '{other}', use 'degrade' or 'propagate'")),
        }
    }
}

/// Interpret a yes/no answer. `"true"` anywhere wins over `"false"`.
pub fn parse_identification(text: &str) -> Option<bool> {
    let lower = text.to_lowercase();
    if lower.contains("true") {
        Some(true)
    } else if lower.contains("false") {
        Some(false)
    } else {
        None
    }
}

/// Placeholder returned by [`VisionDispatcher::describe`] when degrading.
pub fn description_fallback(image: &ImageBuffer) -> String {
    let (width, height) = image.dimensions();
    format!("Error generating AI description. Basic info: {width}x{height} image.")
}

/// Placeholder returned by [`VisionDispatcher::navigate`] when degrading.
pub fn navigation_fallback(target_organ: &str) -> String {
    format!(
        "Error generating navigation guidance for {target_organ}. \
         Please reposition the probe and upload a new image."
    )
}

/// Stateless front door to the vision model. Cheap to clone.
#[derive(Clone)]
pub struct VisionDispatcher {
    provider: Arc<dyn VisionProvider>,
    policy: FailurePolicy,
}

impl VisionDispatcher {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self {
            provider,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ask whether `entity` is visible. Unclear answers count as `false`.
    pub async fn identify(&self, image: &ImageBuffer, entity: &str) -> Result<bool> {
        let query = VisionQuery::new(prompts::identification(entity), image, IDENTIFY_MAX_TOKENS)?;

        match self.provider.complete(&query).await {
            Ok(text) => {
                let parsed = parse_identification(&text);
                if parsed.is_none() {
                    tracing::warn!(entity, answer = %text, "Unclear identification answer, treating as not found");
                }
                Ok(parsed.unwrap_or(false))
            }
            Err(e) => self.degrade(e, "identify", || false),
        }
    }

    /// Free-text answer to `instruction`, returned verbatim.
    pub async fn describe(&self, image: &ImageBuffer, instruction: &str) -> Result<String> {
        match self.complete_long(image, instruction).await {
            Ok(text) => Ok(text),
            Err(e) => self.degrade(e, "describe", || description_fallback(image)),
        }
    }

    /// Diagnostic review of a scan showing `target_organ`.
    pub async fn diagnose(&self, image: &ImageBuffer, target_organ: &str) -> Result<String> {
        self.describe(image, &prompts::diagnostic(target_organ)).await
    }

    /// Probe repositioning guidance toward `target_organ`.
    pub async fn navigate(&self, image: &ImageBuffer, target_organ: &str) -> Result<String> {
        match self.complete_long(image, &prompts::navigation(target_organ)).await {
            Ok(text) => Ok(text),
            Err(e) => self.degrade(e, "navigate", || navigation_fallback(target_organ)),
        }
    }

    async fn complete_long(&self, image: &ImageBuffer, instruction: &str) -> Result<String> {
        let query = VisionQuery::new(instruction, image, DESCRIBE_MAX_TOKENS)?;
        self.provider.complete(&query).await
    }

    fn degrade<T>(&self, error: VisionError, op: &str, fallback: impl FnOnce() -> T) -> Result<T> {
        if !error.is_external() || self.policy == FailurePolicy::Propagate {
            return Err(error);
        }
        tracing::warn!(
            provider = self.provider.name(),
            op,
            "Vision provider call failed, using fallback: {error}"
        );
        Ok(fallback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a canned answer and records what it was asked.
    struct ScriptedProvider {
        answer: std::result::Result<String, fn() -> VisionError>,
        seen: Mutex<Vec<(String, u32)>>,
    }

    impl ScriptedProvider {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(make: fn() -> VisionError) -> Arc<Self> {
            Arc::new(Self {
                answer: Err(make),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl VisionProvider for ScriptedProvider {
        async fn complete(&self, query: &VisionQuery) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((query.instruction().to_string(), query.max_tokens()));
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn image() -> ImageBuffer {
        ImageBuffer::from_rgb(image::RgbImage::new(100, 60))
    }

    fn timeout() -> VisionError {
        VisionError::Transport("operation timed out".to_string())
    }

    #[test]
    fn test_parse_identification_precedence() {
        assert_eq!(parse_identification("true"), Some(true));
        assert_eq!(parse_identification("TRUE."), Some(true));
        assert_eq!(parse_identification("False"), Some(false));
        assert_eq!(parse_identification("false, not true"), Some(true));
        assert_eq!(parse_identification("I cannot tell"), None);
        assert_eq!(parse_identification(""), None);
    }

    #[tokio::test]
    async fn test_identify_uses_short_budget() {
        let provider = ScriptedProvider::ok("True");
        let dispatcher = VisionDispatcher::new(provider.clone());
        assert!(dispatcher.identify(&image(), "heart").await.unwrap());

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].0, prompts::identification("heart"));
        assert_eq!(seen[0].1, IDENTIFY_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_identify_unclear_answer_is_false() {
        let dispatcher = VisionDispatcher::new(ScriptedProvider::ok("maybe?"));
        assert!(!dispatcher.identify(&image(), "heart").await.unwrap());
    }

    #[tokio::test]
    async fn test_identify_degrades_to_false() {
        let dispatcher = VisionDispatcher::new(ScriptedProvider::failing(timeout));
        assert!(!dispatcher.identify(&image(), "heart").await.unwrap());
    }

    #[tokio::test]
    async fn test_identify_propagates_when_configured() {
        let dispatcher = VisionDispatcher::new(ScriptedProvider::failing(timeout))
            .with_policy(FailurePolicy::Propagate);
        let err = dispatcher.identify(&image(), "heart").await.unwrap_err();
        assert!(matches!(err, VisionError::Transport(_)));
    }

    #[tokio::test]
    async fn test_describe_returns_text_verbatim() {
        let text = "  The liver looks normal.\n\nAnything else?  ";
        let provider = ScriptedProvider::ok(text);
        let dispatcher = VisionDispatcher::new(provider.clone());
        assert_eq!(dispatcher.describe(&image(), "describe it").await.unwrap(), text);
        assert_eq!(provider.seen.lock().unwrap()[0].1, DESCRIBE_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_describe_fallback_has_dimensions() {
        let dispatcher = VisionDispatcher::new(ScriptedProvider::failing(|| {
            VisionError::MalformedResponse("no choices".to_string())
        }));
        let text = dispatcher.describe(&image(), "describe it").await.unwrap();
        assert_eq!(text, "Error generating AI description. Basic info: 100x60 image.");
    }

    #[tokio::test]
    async fn test_diagnose_sends_diagnostic_prompt() {
        let provider = ScriptedProvider::ok("report");
        let dispatcher = VisionDispatcher::new(provider.clone());
        dispatcher.diagnose(&image(), "kidney").await.unwrap();
        assert_eq!(provider.seen.lock().unwrap()[0].0, prompts::diagnostic("kidney"));
    }

    #[tokio::test]
    async fn test_navigate_degrades_and_propagates() {
        let degrading = VisionDispatcher::new(ScriptedProvider::failing(timeout));
        assert_eq!(
            degrading.navigate(&image(), "heart").await.unwrap(),
            navigation_fallback("heart")
        );

        let strict = VisionDispatcher::new(ScriptedProvider::failing(|| VisionError::Provider {
            status: 500,
            body: "boom".to_string(),
        }))
        .with_policy(FailurePolicy::Propagate);
        assert!(strict.navigate(&image(), "heart").await.is_err());
    }

    #[tokio::test]
    async fn test_internal_errors_are_never_degraded() {
        let dispatcher = VisionDispatcher::new(ScriptedProvider::failing(|| {
            VisionError::Encode("encoder failed".to_string())
        }));
        assert!(dispatcher.identify(&image(), "heart").await.is_err());
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!("Degrade".parse::<FailurePolicy>().unwrap(), FailurePolicy::Degrade);
        assert_eq!("propagate".parse::<FailurePolicy>().unwrap(), FailurePolicy::Propagate);
        assert!("retry".parse::<FailurePolicy>().is_err());
    }
}
