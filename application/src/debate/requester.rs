//! Request/reply over the bus.

use super::DebateError;
use crate::messaging::{MessageBus, SubscriptionGuard};
use mcp_domain::{DebateSession, TriggerDebate, event_types};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

type Reply = Result<DebateSession, DebateError>;

/// Publishes `trigger_debate` and waits for the correlated answer.
///
/// The reply listeners resolve a one-shot channel on the first matching
/// `debate_result` or `debate_failed` and are unsubscribed when
/// [`request`](Self::request) returns, whether it matched, timed out, or its
/// future was dropped.
#[derive(Clone)]
pub struct DebateRequester {
    bus: MessageBus,
    timeout: Duration,
}

impl DebateRequester {
    pub fn new(bus: MessageBus, timeout: Duration) -> Self {
        Self { bus, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn request(
        &self,
        session_id: &str,
        topic: &str,
        agent_output: &str,
    ) -> Result<DebateSession, DebateError> {
        for (field, value) in [
            ("session id", session_id),
            ("topic", topic),
            ("agent output", agent_output),
        ] {
            if value.trim().is_empty() {
                return Err(DebateError::Validation(format!("{} is required", field)));
            }
        }

        let (tx, rx) = oneshot::channel::<Reply>();
        let slot = Arc::new(Mutex::new(Some(tx)));
        let mut listeners = SubscriptionGuard::default();

        for event_type in [event_types::DEBATE_RESULT, event_types::DEBATE_FAILED] {
            let slot = Arc::clone(&slot);
            let correlation_id = session_id.to_string();
            listeners.push(self.bus.subscribe(event_type, move |message| {
                if message.correlation_id != correlation_id {
                    return Ok(());
                }
                let Some(tx) = slot.lock().map_err(|_| "debate reply slot poisoned")?.take()
                else {
                    return Ok(());
                };
                let reply = if message.is(event_types::DEBATE_RESULT) {
                    serde_json::from_value::<DebateSession>(message.payload.clone()).map_err(|e| {
                        DebateError::Failed(format!("malformed debate result: {}", e))
                    })
                } else {
                    Err(DebateError::Failed(
                        message
                            .payload
                            .get("error")
                            .and_then(Value::as_str)
                            .unwrap_or("unknown error")
                            .to_string(),
                    ))
                };
                let _ = tx.send(reply);
                Ok(())
            }));
        }

        debug!("Debate requested for session {}: {}", session_id, topic);
        self.bus.publish(
            TriggerDebate {
                topic: topic.to_string(),
                agent_output: agent_output.to_string(),
                session_id: session_id.to_string(),
            }
            .into_message(),
        );

        let reply = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err(DebateError::Failed(
                "debate reply channel closed".to_string(),
            )),
            Err(_) => Err(DebateError::TimedOut(self.timeout)),
        };
        drop(listeners);
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::{DebateCoordinator, DebateParticipant};
    use crate::ports::llm_gateway::GatewayError;
    use async_trait::async_trait;
    use mcp_domain::Message;
    use serde_json::json;

    struct Agreeable(&'static str);

    #[async_trait]
    impl DebateParticipant for Agreeable {
        fn name(&self) -> &str {
            self.0
        }

        async fn argue(
            &self,
            _topic: &str,
            _agent_output: &str,
            _session: &DebateSession,
            round: u32,
        ) -> Result<String, GatewayError> {
            Ok(format!("Agreed in round {}", round))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_without_coordinator() {
        let bus = MessageBus::new();
        let requester = DebateRequester::new(bus.clone(), Duration::from_millis(200));

        let err = requester
            .request("s1", "Is the plan robust?", "3 trucks")
            .await
            .unwrap_err();

        assert_eq!(err, DebateError::TimedOut(Duration::from_millis(200)));
        assert_eq!(bus.subscriber_count(event_types::DEBATE_RESULT), 0);
        assert_eq!(bus.subscriber_count(event_types::DEBATE_FAILED), 0);
    }

    #[tokio::test]
    async fn test_receives_result_from_coordinator() {
        let bus = MessageBus::new();
        let participants: Vec<Arc<dyn DebateParticipant>> =
            vec![Arc::new(Agreeable("a")), Arc::new(Agreeable("b"))];
        let _coordinator =
            Arc::new(DebateCoordinator::new(bus.clone(), participants).with_rounds(2)).start();
        let requester = DebateRequester::new(bus.clone(), Duration::from_secs(5));

        let session = requester.request("s1", "topic", "output").await.unwrap();

        assert_eq!(session.rounds().len(), 4);
        assert_eq!(bus.subscriber_count(event_types::DEBATE_RESULT), 0);
    }

    #[tokio::test]
    async fn test_ignores_other_sessions_and_reports_failure() {
        let bus = MessageBus::new();
        let replier = bus.clone();
        let _responder = bus.subscribe(event_types::TRIGGER_DEBATE, move |m| {
            replier.publish(Message::new(
                event_types::DEBATE_FAILED,
                json!({"error": "other session"}),
                "someone-else",
            ));
            replier.publish(Message::new(
                event_types::DEBATE_FAILED,
                json!({"error": "defender timed out"}),
                m.correlation_id.clone(),
            ));
            Ok(())
        });
        let requester = DebateRequester::new(bus, Duration::from_secs(1));

        let err = requester.request("s1", "topic", "output").await.unwrap_err();

        assert_eq!(err, DebateError::Failed("defender timed out".to_string()));
    }

    #[tokio::test]
    async fn test_rejects_blank_inputs() {
        let requester = DebateRequester::new(MessageBus::new(), Duration::from_secs(1));
        assert!(matches!(
            requester.request("s1", " ", "output").await,
            Err(DebateError::Validation(msg)) if msg == "topic is required"
        ));
    }
}
