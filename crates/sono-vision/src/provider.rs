//! External inference service boundary.
//!
//! The dispatcher only needs "submit instruction text plus an inline image,
//! get generated text back". [`VisionProvider`] captures that; the bundled
//! [`ChatCompletionsProvider`] speaks the chat-completions wire format.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::query::VisionQuery;
use crate::types::{Result, VisionError};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Anything that can answer a [`VisionQuery`] with text.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    async fn complete(&self, query: &VisionQuery) -> Result<String>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

/// Settings for [`ChatCompletionsProvider`].
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP provider for `POST {base_url}/chat/completions`.
///
/// Holds one pooled client for the life of the process.
#[derive(Clone)]
pub struct ChatCompletionsProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletionsProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VisionError::Transport(format!("failed to build HTTP client: {e}")))?;

        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
            model: config.model,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, query: &'a VisionQuery) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            max_tokens: query.max_tokens(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: query.instruction(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: query.image_data_url(),
                        },
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl VisionProvider for ChatCompletionsProvider {
    async fn complete(&self, query: &VisionQuery) -> Result<String> {
        let mut request = self.client.post(&self.endpoint).json(&self.request_body(query));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            max_tokens = query.max_tokens(),
            "sending vision query"
        );

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| VisionError::MalformedResponse(format!("invalid JSON: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| VisionError::MalformedResponse("response has no message content".to_string()))
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}
