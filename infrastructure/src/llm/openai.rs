//! OpenAI-compatible chat completions gateway.

use async_trait::async_trait;
use mcp_application::{GatewayError, LlmCallConfig, LlmGateway, LlmReply};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    default_model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn call(
        &self,
        prompt: &str,
        config: Option<&LlmCallConfig>,
    ) -> Result<LlmReply, GatewayError> {
        let model = config
            .and_then(|c| c.model.as_deref())
            .unwrap_or(&self.default_model);

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = config.and_then(|c| c.system_prompt.as_deref()) {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let body = ChatRequest {
            model,
            messages,
            temperature: config.and_then(|c| c.temperature),
            max_tokens: config.and_then(|c| c.max_tokens),
        };

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!("LLM request to {} (model {})", self.base_url, model);
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::ConnectionError(e.to_string())
            }
        })?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(GatewayError::ModelNotAvailable(model.to_string()));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(LlmReply::new)
            .ok_or_else(|| GatewayError::InvalidResponse("no choices in response".to_string()))
    }
}
