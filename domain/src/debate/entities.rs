//! Debate session entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contribution to a debate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateRound {
    pub agent: String,
    pub argument: String,
    /// 1-based round number; every participant speaks once per round.
    pub round: u32,
    pub timestamp: DateTime<Utc>,
    /// Self-assessed quality score (1-10) parsed from the argument, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl DebateRound {
    pub fn new(agent: impl Into<String>, argument: impl Into<String>, round: u32) -> Self {
        Self {
            agent: agent.into(),
            argument: argument.into(),
            round,
            timestamp: Utc::now(),
            score: None,
        }
    }

    pub fn with_score(mut self, score: Option<f64>) -> Self {
        self.score = score;
        self
    }
}

/// A finished or in-flight debate.
///
/// `rounds` is append-only and kept in speaking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateSession {
    pub debate_id: String,
    pub topic: String,
    #[serde(default)]
    rounds: Vec<DebateRound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

impl DebateSession {
    pub fn new(debate_id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            debate_id: debate_id.into(),
            topic: topic.into(),
            rounds: Vec::new(),
            summary: None,
            winner: None,
        }
    }

    pub fn push_round(&mut self, round: DebateRound) {
        self.rounds.push(round);
    }

    pub fn rounds(&self) -> &[DebateRound] {
        &self.rounds
    }

    /// Distinct participant names in first-speaking order.
    pub fn participants(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for round in &self.rounds {
            if !names.contains(&round.agent.as_str()) {
                names.push(&round.agent);
            }
        }
        names
    }

    /// Render prior rounds as a transcript for the next speaker's prompt.
    pub fn transcript(&self) -> String {
        self.rounds
            .iter()
            .map(|r| format!("[Round {}] {}: {}", r.round, r.agent, r.argument))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participants_in_speaking_order() {
        let mut session = DebateSession::new("d1", "Is the route plan robust?");
        session.push_round(DebateRound::new("challenger", "No", 1));
        session.push_round(DebateRound::new("defender", "Yes", 1));
        session.push_round(DebateRound::new("challenger", "Still no", 2));

        assert_eq!(session.participants(), vec!["challenger", "defender"]);
        assert_eq!(session.rounds().len(), 3);
    }

    #[test]
    fn test_transcript_format() {
        let mut session = DebateSession::new("d1", "topic");
        session.push_round(DebateRound::new("a", "first", 1));
        session.push_round(DebateRound::new("b", "second", 1));
        assert_eq!(session.transcript(), "[Round 1] a: first\n\n[Round 1] b: second");
    }

    #[test]
    fn test_session_serializes_camel_case() {
        let session = DebateSession::new("d1", "topic");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["debateId"], "d1");
        assert!(json["rounds"].as_array().unwrap().is_empty());
        assert!(json.get("winner").is_none());
    }
}
