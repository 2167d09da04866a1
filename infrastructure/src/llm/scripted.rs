//! Offline gateway that replays a fixed script.

use async_trait::async_trait;
use mcp_application::{GatewayError, LlmCallConfig, LlmGateway, LlmReply};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Returns scripted replies in order, then the fallback (if any).
pub struct ScriptedLlmGateway {
    replies: Mutex<VecDeque<String>>,
    fallback: Option<String>,
}

impl ScriptedLlmGateway {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: None,
        }
    }

    /// Load a JSON array of strings.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let replies: Vec<String> = serde_json::from_str(&text)?;
        Ok(Self::new(replies))
    }

    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmGateway for ScriptedLlmGateway {
    async fn call(
        &self,
        prompt: &str,
        _config: Option<&LlmCallConfig>,
    ) -> Result<LlmReply, GatewayError> {
        debug!("Scripted LLM call ({} chars)", prompt.len());
        let next = self
            .replies
            .lock()
            .map_err(|e| GatewayError::Other(e.to_string()))?
            .pop_front();
        next.or_else(|| self.fallback.clone())
            .map(LlmReply::new)
            .ok_or_else(|| GatewayError::ModelNotAvailable("offline script exhausted".to_string()))
    }
}
