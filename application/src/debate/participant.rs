//! Debate participants.

use crate::ports::llm_gateway::{GatewayError, LlmCallConfig, LlmGateway};
use async_trait::async_trait;
use mcp_domain::{DebateSession, PromptTemplate};
use std::fmt;
use std::sync::Arc;

/// One voice in a debate.
#[async_trait]
pub trait DebateParticipant: Send + Sync {
    fn name(&self) -> &str;

    /// Produce this participant's argument for `round`, having seen every
    /// earlier contribution in `session`.
    async fn argue(
        &self,
        topic: &str,
        agent_output: &str,
        session: &DebateSession,
        round: u32,
    ) -> Result<String, GatewayError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebateRole {
    Challenger,
    Defender,
}

impl DebateRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebateRole::Challenger => "challenger",
            DebateRole::Defender => "defender",
        }
    }

    fn stance(&self) -> &'static str {
        match self {
            DebateRole::Challenger => {
                "find the weaknesses in the output and argue against accepting it"
            }
            DebateRole::Defender => "defend the output and answer each objection raised",
        }
    }
}

impl fmt::Display for DebateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Participant backed by an LLM playing a fixed role.
pub struct LlmDebateParticipant {
    name: String,
    role: DebateRole,
    gateway: Arc<dyn LlmGateway>,
    config: LlmCallConfig,
}

impl LlmDebateParticipant {
    pub fn new(name: impl Into<String>, role: DebateRole, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            name: name.into(),
            role,
            gateway,
            config: LlmCallConfig::default()
                .with_system_prompt(PromptTemplate::debate_system(role.stance())),
        }
    }

    pub fn challenger(gateway: Arc<dyn LlmGateway>) -> Self {
        Self::new(DebateRole::Challenger.as_str(), DebateRole::Challenger, gateway)
    }

    pub fn defender(gateway: Arc<dyn LlmGateway>) -> Self {
        Self::new(DebateRole::Defender.as_str(), DebateRole::Defender, gateway)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config = self.config.with_model(model);
        self
    }

    pub fn role(&self) -> DebateRole {
        self.role
    }
}

#[async_trait]
impl DebateParticipant for LlmDebateParticipant {
    fn name(&self) -> &str {
        &self.name
    }

    async fn argue(
        &self,
        topic: &str,
        agent_output: &str,
        session: &DebateSession,
        round: u32,
    ) -> Result<String, GatewayError> {
        let prompt =
            PromptTemplate::debate_prompt(topic, agent_output, &session.transcript(), round);
        let reply = self.gateway.call(&prompt, Some(&self.config)).await?;
        let argument = reply.content.trim();
        if argument.is_empty() {
            return Err(GatewayError::InvalidResponse(format!(
                "{} returned an empty argument",
                self.name
            )));
        }
        Ok(argument.to_string())
    }
}
