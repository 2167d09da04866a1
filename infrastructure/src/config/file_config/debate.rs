//! Debate configuration from TOML (`[debate]` section)

use super::{ConfigIssue, ConfigIssueCode};
use mcp_application::DebateParams;
use mcp_domain::strategy_by_name;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw debate configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Rounds per participant
    pub rounds: u32,
    /// How long a requester waits for the verdict
    pub timeout_secs: u64,
    /// Verdict rule: `undecided`, `highest_mean_score` or `judge_mention`
    pub strategy: String,
    /// Ask the LLM to judge the transcript before the verdict
    pub judge: bool,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let params = DebateParams::default();
        Self {
            rounds: params.rounds,
            timeout_secs: params.timeout.as_secs(),
            strategy: params.strategy,
            judge: false,
        }
    }
}

impl FileDebateConfig {
    pub fn to_params(&self) -> DebateParams {
        DebateParams::default()
            .with_rounds(self.rounds)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_strategy(self.strategy.clone())
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.rounds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidValue {
                    field: "debate.rounds".to_string(),
                },
                "debate.rounds must be at least 1",
            ));
        }
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidValue {
                    field: "debate.timeout_secs".to_string(),
                },
                "debate.timeout_secs must be greater than zero",
            ));
        }
        if strategy_by_name(&self.strategy).is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownStrategy {
                    value: self.strategy.clone(),
                },
                format!(
                    "debate.strategy: unknown value '{}' (expected undecided, highest_mean_score or judge_mention)",
                    self.strategy
                ),
            ));
        }
        if self.judge && self.strategy == "undecided" {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidValue {
                    field: "debate.judge".to_string(),
                },
                "debate.judge is enabled but the undecided strategy ignores the judge",
            ));
        }
        issues
    }
}
