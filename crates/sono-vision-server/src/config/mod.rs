//! Configuration loading and resolution.
//!
//! Each setting resolves as: explicit CLI value, then environment, then default.

use std::time::Duration;

use sono_vision::provider::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use sono_vision::{FailurePolicy, ProviderConfig};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

const API_KEY_VARS: &[&str] = &["SONO_API_KEY", "CLAUDE_API_KEY"];
const BASE_URL_VARS: &[&str] = &["SONO_BASE_URL"];
const MODEL_VARS: &[&str] = &["SONO_MODEL"];

/// Fully resolved server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub provider: ProviderConfig,
    pub failure_policy: FailurePolicy,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            provider: ProviderConfig::default(),
            failure_policy: FailurePolicy::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub addr: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub failure_policy: Option<FailurePolicy>,
    pub max_upload_mb: Option<usize>,
}

impl ServerConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with(overrides: ConfigOverrides, env: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = resolve_value(overrides.api_key, API_KEY_VARS, &env);
        let base_url = resolve_value(overrides.base_url, BASE_URL_VARS, &env)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = resolve_value(overrides.model, MODEL_VARS, &env)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let timeout_secs = overrides.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_upload_mb = overrides.max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        Self {
            addr: overrides.addr.unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            provider: ProviderConfig {
                base_url,
                api_key,
                model,
                timeout: Duration::from_secs(timeout_secs),
            },
            failure_policy: overrides.failure_policy.unwrap_or_default(),
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
        }
    }
}

fn resolve_value(
    explicit: Option<String>,
    vars: &[&str],
    env: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    explicit
        .or_else(|| vars.iter().find_map(|key| env(key)))
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::resolve_with(ConfigOverrides::default(), env_of(&[]));
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.failure_policy, FailurePolicy::Degrade);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_api_key_env_order() {
        let config = ServerConfig::resolve_with(
            ConfigOverrides::default(),
            env_of(&[("CLAUDE_API_KEY", "claude"), ("SONO_API_KEY", "sono")]),
        );
        assert_eq!(config.provider.api_key.as_deref(), Some("sono"));

        let config = ServerConfig::resolve_with(
            ConfigOverrides::default(),
            env_of(&[("CLAUDE_API_KEY", "claude")]),
        );
        assert_eq!(config.provider.api_key.as_deref(), Some("claude"));
    }

    #[test]
    fn test_explicit_beats_env() {
        let overrides = ConfigOverrides {
            api_key: Some("flag".to_string()),
            model: Some("flag-model".to_string()),
            timeout_secs: Some(5),
            failure_policy: Some(FailurePolicy::Propagate),
            max_upload_mb: Some(2),
            ..ConfigOverrides::default()
        };
        let config = ServerConfig::resolve_with(
            overrides,
            env_of(&[("SONO_API_KEY", "env"), ("SONO_MODEL", "env-model")]),
        );
        assert_eq!(config.provider.api_key.as_deref(), Some("flag"));
        assert_eq!(config.provider.model, "flag-model");
        assert_eq!(config.provider.timeout, Duration::from_secs(5));
        assert_eq!(config.failure_policy, FailurePolicy::Propagate);
        assert_eq!(config.max_upload_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn test_huge_upload_limit_saturates() {
        let overrides = ConfigOverrides {
            max_upload_mb: Some(usize::MAX / 2),
            ..ConfigOverrides::default()
        };
        let config = ServerConfig::resolve_with(overrides, env_of(&[]));
        assert_eq!(config.max_upload_bytes, usize::MAX);
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config =
            ServerConfig::resolve_with(ConfigOverrides::default(), env_of(&[("SONO_API_KEY", "  ")]));
        assert!(config.provider.api_key.is_none());
    }
}
