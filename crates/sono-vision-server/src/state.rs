//! Process-wide state shared by all handlers.

use std::sync::Arc;

use sono_vision::{ChatCompletionsProvider, VisionDispatcher, VisionProvider};

use crate::config::ServerConfig;
use crate::types::{ApiError, ApiResult};

/// Built once at startup and never torn down. The provider only holds
/// credentials and a connection pool, so no locking is needed.
pub struct AppState {
    pub dispatcher: VisionDispatcher,
}

impl AppState {
    pub fn new(dispatcher: VisionDispatcher) -> Self {
        Self { dispatcher }
    }

    /// State backed by a custom provider.
    pub fn with_provider(provider: Arc<dyn VisionProvider>, config: &ServerConfig) -> Self {
        Self::new(VisionDispatcher::new(provider).with_policy(config.failure_policy))
    }

    /// State backed by the chat-completions HTTP provider.
    pub fn from_config(config: &ServerConfig) -> ApiResult<Self> {
        if config.provider.api_key.is_none() {
            tracing::warn!("No API key configured; vision requests will likely be rejected");
        }
        let provider = ChatCompletionsProvider::new(config.provider.clone())
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        tracing::info!(
            endpoint = provider.endpoint(),
            model = provider.model(),
            policy = ?config.failure_policy,
            "Vision provider ready"
        );
        Ok(Self::with_provider(Arc::new(provider), config))
    }
}
