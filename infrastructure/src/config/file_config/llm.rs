//! LLM configuration from TOML (`[llm]` section)

use super::{ConfigIssue, ConfigIssueCode};
use mcp_application::LlmCallConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which gateway adapter to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Replays scripted replies; no network.
    #[default]
    Offline,
    /// Any OpenAI-compatible chat completions endpoint.
    #[serde(alias = "openai-compatible")]
    OpenAi,
}

/// Raw LLM configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    pub provider: LlmProvider,
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// JSON array of replies for the offline provider
    pub script: Option<PathBuf>,
}

impl FileLlmConfig {
    /// Per-call defaults handed to every agent.
    pub fn call_config(&self) -> LlmCallConfig {
        let mut config = LlmCallConfig::default();
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            config = config.with_max_tokens(max_tokens);
        }
        config
    }

    /// API key read from `api_key_env`, if both are present.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.is_empty())
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.provider == LlmProvider::OpenAi && self.base_url.is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "llm.base_url".to_string(),
                },
                "llm.base_url is required for the openai provider",
            ));
        }
        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidValue {
                    field: "llm.temperature".to_string(),
                },
                format!("llm.temperature {} is outside 0.0..=2.0", t),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_config_copies_settings() {
        let config = FileLlmConfig {
            model: Some("llama3".to_string()),
            temperature: Some(0.2),
            ..Default::default()
        };
        let call = config.call_config();
        assert_eq!(call.model.as_deref(), Some("llama3"));
        assert_eq!(call.temperature, Some(0.2));
        assert!(call.max_tokens.is_none());
    }

    #[test]
    fn test_provider_alias() {
        let config: FileLlmConfig =
            toml::from_str(r#"provider = "openai-compatible""#).unwrap();
        assert_eq!(config.provider, LlmProvider::OpenAi);
    }
}
