//! Bus messages.
//!
//! A [`Message`] is the unit published on the in-process bus. Its
//! `correlation_id` is the only join key between an asynchronous reply and
//! the session or request that caused it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known message types.
pub mod event_types {
    /// Subscribe to this to receive every message.
    pub const WILDCARD: &str = "*";

    pub const TRIGGER_DEBATE: &str = "trigger_debate";
    pub const DEBATE_ROUND: &str = "debate_round";
    pub const DEBATE_RESULT: &str = "debate_result";
    pub const DEBATE_FAILED: &str = "debate_failed";

    pub const CRITIQUE_READY: &str = "critique_ready";

    pub const REVIEW_REQUESTED: &str = "review_requested";
    pub const REVIEW_DECIDED: &str = "review_decided";

    pub const STEP_STARTED: &str = "step_started";
    pub const STEP_COMPLETED: &str = "step_completed";
    pub const RUN_COMPLETED: &str = "run_completed";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "type")]
    pub message_type: String,
    pub payload: Value,
    pub correlation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl Message {
    pub fn new(
        message_type: impl Into<String>,
        payload: Value,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            message_type: message_type.into(),
            payload,
            correlation_id: correlation_id.into(),
            from: None,
        }
    }

    pub fn from_agent(mut self, agent: impl Into<String>) -> Self {
        self.from = Some(agent.into());
        self
    }

    pub fn is(&self, message_type: &str) -> bool {
        self.message_type == message_type
    }
}

/// Payload of a `trigger_debate` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDebate {
    pub topic: String,
    pub agent_output: String,
    pub session_id: String,
}

impl TriggerDebate {
    pub fn into_message(self) -> Message {
        let correlation_id = self.session_id.clone();
        let payload = serde_json::to_value(&self).unwrap_or(Value::Null);
        Message::new(event_types::TRIGGER_DEBATE, payload, correlation_id)
    }

    pub fn from_message(message: &Message) -> Result<Self, serde_json::Error> {
        serde_json::from_value(message.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let msg = Message::new("critique_ready", serde_json::json!({"score": 7}), "s1")
            .from_agent("critic");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "critique_ready");
        assert_eq!(json["correlationId"], "s1");
        assert_eq!(json["from"], "critic");
        assert!(msg.is(event_types::CRITIQUE_READY));
    }

    #[test]
    fn test_trigger_debate_uses_session_as_correlation() {
        let msg = TriggerDebate {
            topic: "Is the schedule fair?".to_string(),
            agent_output: "Shift plan v2".to_string(),
            session_id: "s42".to_string(),
        }
        .into_message();

        assert_eq!(msg.message_type, event_types::TRIGGER_DEBATE);
        assert_eq!(msg.correlation_id, "s42");
        assert_eq!(msg.payload["agentOutput"], "Shift plan v2");

        let parsed = TriggerDebate::from_message(&msg).unwrap();
        assert_eq!(parsed.topic, "Is the schedule fair?");
    }
}
