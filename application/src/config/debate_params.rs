//! Debate parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateParams {
    /// Rounds per debate. Every participant speaks once per round.
    pub rounds: u32,
    /// How long a requester waits for `debate_result` or `debate_failed`.
    pub timeout: Duration,
    /// Verdict rule, resolved with `mcp_domain::strategy_by_name`.
    pub strategy: String,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            rounds: 2,
            timeout: Duration::from_secs(60),
            strategy: "undecided".to_string(),
        }
    }
}

impl DebateParams {
    // ==================== Builder Methods ====================

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DebateParams::default();
        assert_eq!(params.rounds, 2);
        assert_eq!(params.timeout, Duration::from_secs(60));
        assert_eq!(params.strategy, "undecided");
    }

    #[test]
    fn test_builder() {
        let params = DebateParams::default()
            .with_rounds(3)
            .with_timeout(Duration::from_millis(500))
            .with_strategy("judge_mention");
        assert_eq!(params.rounds, 3);
        assert_eq!(params.timeout, Duration::from_millis(500));
        assert_eq!(params.strategy, "judge_mention");
    }
}
