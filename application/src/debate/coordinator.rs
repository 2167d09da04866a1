//! Debate coordinator.

use super::DebateError;
use super::participant::DebateParticipant;
use crate::config::DebateParams;
use crate::messaging::{MessageBus, Subscription};
use crate::ports::llm_gateway::LlmGateway;
use mcp_domain::{
    DebateRound, DebateSession, Message, PromptTemplate, ScoringStrategy, TriggerDebate,
    Undecided, event_types, parse_score, strategy_by_name,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const NAME: &str = "debate_coordinator";

/// Runs debates requested over the bus.
///
/// Every participant speaks once per round, in registration order, and sees
/// all earlier contributions. After the last round an optional judge model
/// summarizes the transcript and the [`ScoringStrategy`] settles the verdict.
pub struct DebateCoordinator {
    bus: MessageBus,
    participants: Vec<Arc<dyn DebateParticipant>>,
    rounds: u32,
    strategy: Arc<dyn ScoringStrategy>,
    judge: Option<Arc<dyn LlmGateway>>,
}

impl DebateCoordinator {
    pub fn new(bus: MessageBus, participants: Vec<Arc<dyn DebateParticipant>>) -> Self {
        Self {
            bus,
            participants,
            rounds: DebateParams::default().rounds,
            strategy: Arc::new(Undecided),
            judge: None,
        }
    }

    /// Build from configuration; fails on an unknown strategy name.
    pub fn from_params(
        bus: MessageBus,
        participants: Vec<Arc<dyn DebateParticipant>>,
        params: &DebateParams,
    ) -> Result<Self, DebateError> {
        let strategy = strategy_by_name(&params.strategy).ok_or_else(|| {
            DebateError::Validation(format!("unknown scoring strategy '{}'", params.strategy))
        })?;
        Ok(Self::new(bus, participants)
            .with_rounds(params.rounds)
            .with_strategy(Arc::from(strategy)))
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds.max(1);
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn ScoringStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_judge(mut self, judge: Arc<dyn LlmGateway>) -> Self {
        self.judge = Some(judge);
        self
    }

    /// Listen for `trigger_debate` and run each debate in its own task.
    ///
    /// The coordinator stays alive until the returned subscription is
    /// unsubscribed. Triggers published outside a tokio runtime are logged
    /// and dropped.
    pub fn start(self: Arc<Self>) -> Subscription {
        let bus = self.bus.clone();
        bus.subscribe(event_types::TRIGGER_DEBATE, move |message| {
            let trigger = TriggerDebate::from_message(message)?;
            let handle = tokio::runtime::Handle::try_current()?;
            let coordinator = Arc::clone(&self);
            let correlation_id = message.correlation_id.clone();
            handle.spawn(async move {
                coordinator.respond(trigger, correlation_id).await;
            });
            Ok(())
        })
    }

    async fn respond(&self, trigger: TriggerDebate, correlation_id: String) {
        let reply = match self.conduct(&trigger).await {
            Ok(session) => match serde_json::to_value(&session) {
                Ok(payload) => Message::new(event_types::DEBATE_RESULT, payload, correlation_id),
                Err(e) => Message::new(
                    event_types::DEBATE_FAILED,
                    json!({ "error": e.to_string() }),
                    correlation_id,
                ),
            },
            Err(e) => {
                warn!("Debate on '{}' failed: {}", trigger.topic, e);
                Message::new(
                    event_types::DEBATE_FAILED,
                    json!({ "error": e.to_string() }),
                    correlation_id,
                )
            }
        };
        self.bus.publish(reply.from_agent(NAME));
    }

    /// Run one debate to completion without publishing its result.
    ///
    /// Each contribution is still published as `debate_round`.
    pub async fn conduct(&self, trigger: &TriggerDebate) -> Result<DebateSession, DebateError> {
        if self.participants.is_empty() {
            return Err(DebateError::Validation(
                "no debate participants registered".to_string(),
            ));
        }

        let mut session = DebateSession::new(Uuid::new_v4().to_string(), &trigger.topic);
        info!(
            "Debate {} on '{}': {} participant(s), {} round(s)",
            session.debate_id,
            trigger.topic,
            self.participants.len(),
            self.rounds
        );

        for round in 1..=self.rounds {
            for participant in &self.participants {
                let argument = participant
                    .argue(&trigger.topic, &trigger.agent_output, &session, round)
                    .await
                    .map_err(|e| {
                        DebateError::Failed(format!(
                            "{} failed in round {}: {}",
                            participant.name(),
                            round,
                            e
                        ))
                    })?;
                let score = parse_score(&argument);
                let entry =
                    DebateRound::new(participant.name(), argument, round).with_score(score);
                debug!(
                    "Debate {}: round {} from {}",
                    session.debate_id, round, entry.agent
                );

                if let Ok(payload) = serde_json::to_value(&entry) {
                    self.bus.publish(
                        Message::new(
                            event_types::DEBATE_ROUND,
                            payload,
                            trigger.session_id.clone(),
                        )
                        .from_agent(participant.name()),
                    );
                }
                session.push_round(entry);
            }
        }

        let judge_summary = match &self.judge {
            Some(judge) => {
                let prompt = PromptTemplate::judge_prompt(&trigger.topic, &session.transcript());
                match judge.call(&prompt, None).await {
                    Ok(reply) => Some(reply.content),
                    Err(e) => {
                        warn!("Debate judge unavailable, using default summary: {}", e);
                        None
                    }
                }
            }
            None => None,
        };

        let verdict = self.strategy.judge(&session, judge_summary.as_deref());
        debug!(
            "Debate {}: strategy={}, winner={:?}",
            session.debate_id,
            self.strategy.name(),
            verdict.winner
        );
        session.summary = Some(verdict.summary);
        session.winner = verdict.winner;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use async_trait::async_trait;
    use mcp_domain::HighestMeanScore;
    use std::sync::Mutex;

    // ==================== Helper ====================

    struct Fixed {
        name: &'static str,
        score: u32,
    }

    #[async_trait]
    impl DebateParticipant for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn argue(
            &self,
            _topic: &str,
            _agent_output: &str,
            session: &DebateSession,
            round: u32,
        ) -> Result<String, GatewayError> {
            Ok(format!(
                "{} sees {} prior round(s) in round {}. Score: {}/10",
                self.name,
                session.rounds().len(),
                round,
                self.score
            ))
        }
    }

    struct Broken;

    #[async_trait]
    impl DebateParticipant for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn argue(
            &self,
            _topic: &str,
            _agent_output: &str,
            _session: &DebateSession,
            _round: u32,
        ) -> Result<String, GatewayError> {
            Err(GatewayError::Timeout)
        }
    }

    fn pair() -> Vec<Arc<dyn DebateParticipant>> {
        vec![
            Arc::new(Fixed {
                name: "challenger",
                score: 4,
            }),
            Arc::new(Fixed {
                name: "defender",
                score: 8,
            }),
        ]
    }

    fn trigger(session_id: &str) -> TriggerDebate {
        TriggerDebate {
            topic: "Is the route plan robust?".to_string(),
            agent_output: "3 trucks, cost 1200".to_string(),
            session_id: session_id.to_string(),
        }
    }

    // ==================== conduct ====================

    #[tokio::test]
    async fn test_two_participants_three_rounds() {
        let bus = MessageBus::new();
        let published = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&published);
        let _sub = bus.subscribe(event_types::DEBATE_ROUND, move |m| {
            assert_eq!(m.correlation_id, "s1");
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        let coordinator = DebateCoordinator::new(bus, pair()).with_rounds(3);
        let session = coordinator.conduct(&trigger("s1")).await.unwrap();

        assert_eq!(session.rounds().len(), 6);
        assert_eq!(*published.lock().unwrap(), 6);
        assert_eq!(session.participants(), vec!["challenger", "defender"]);
        // Turn-taking: the n-th contribution has seen n-1 earlier ones.
        assert!(session.rounds()[5].argument.contains("sees 5 prior"));
        assert_eq!(session.rounds()[5].round, 3);
        assert!(session.summary.is_some());
        assert!(session.winner.is_none());
    }

    #[tokio::test]
    async fn test_strategy_decides_winner() {
        let coordinator = DebateCoordinator::new(MessageBus::new(), pair())
            .with_strategy(Arc::new(HighestMeanScore));
        let session = coordinator.conduct(&trigger("s1")).await.unwrap();
        assert_eq!(session.winner.as_deref(), Some("defender"));
    }

    #[tokio::test]
    async fn test_participant_failure_aborts() {
        let coordinator = DebateCoordinator::new(MessageBus::new(), vec![Arc::new(Broken)]);
        let err = coordinator.conduct(&trigger("s1")).await.unwrap_err();
        assert!(
            matches!(err, DebateError::Failed(msg) if msg.contains("broken failed in round 1"))
        );
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let params = DebateParams::default().with_strategy("coin_flip");
        assert!(matches!(
            DebateCoordinator::from_params(MessageBus::new(), pair(), &params),
            Err(DebateError::Validation(_))
        ));
    }

    // ==================== Bus round-trip ====================

    #[tokio::test]
    async fn test_trigger_yields_debate_result_with_session_id() {
        let bus = MessageBus::new();
        let (tx, rx) = tokio::sync::oneshot::channel::<Message>();
        let tx = Mutex::new(Some(tx));
        let _result = bus.subscribe(event_types::DEBATE_RESULT, move |m| {
            if let Some(tx) = tx.lock().unwrap().take() {
                let _ = tx.send(m.clone());
            }
            Ok(())
        });

        let coordinator = Arc::new(DebateCoordinator::new(bus.clone(), pair()).with_rounds(2));
        let _listening = coordinator.start();
        bus.publish(trigger("session-7").into_message());

        let message = rx.await.unwrap();
        assert_eq!(message.correlation_id, "session-7");
        let session: DebateSession = serde_json::from_value(message.payload).unwrap();
        assert_eq!(session.rounds().len(), 4);
    }
}
