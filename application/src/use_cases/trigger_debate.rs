//! Trigger debate use case.

use crate::debate::{DebateError, DebateRequester};
use mcp_domain::DebateSession;
use tracing::info;
use uuid::Uuid;

/// Requests a standalone debate and waits for the verdict.
pub struct TriggerDebateUseCase {
    requester: DebateRequester,
}

impl TriggerDebateUseCase {
    pub fn new(requester: DebateRequester) -> Self {
        Self { requester }
    }

    /// Run a debate about `agent_output`.
    ///
    /// Without a `session_id` a fresh correlation id is generated.
    pub async fn trigger(
        &self,
        session_id: Option<&str>,
        topic: &str,
        agent_output: &str,
    ) -> Result<DebateSession, DebateError> {
        let session_id = match session_id {
            Some(id) => id.to_string(),
            None => format!("debate-{}", Uuid::new_v4()),
        };
        info!("Triggering debate for {}: {}", session_id, topic);
        self.requester.request(&session_id, topic, agent_output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::MessageBus;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_silent_bus_times_out() {
        let use_case = TriggerDebateUseCase::new(DebateRequester::new(
            MessageBus::new(),
            Duration::from_millis(200),
        ));

        let err = use_case
            .trigger(None, "Is the plan robust?", "3 trucks")
            .await
            .unwrap_err();

        assert_eq!(err, DebateError::TimedOut(Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn test_missing_output_is_validation_error() {
        let use_case = TriggerDebateUseCase::new(DebateRequester::new(
            MessageBus::new(),
            Duration::from_secs(1),
        ));
        assert!(matches!(
            use_case.trigger(Some("s1"), "topic", "").await,
            Err(DebateError::Validation(_))
        ));
    }
}
