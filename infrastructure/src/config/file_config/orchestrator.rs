//! Orchestrator configuration from TOML (`[orchestrator]` section)

use super::{ConfigIssue, ConfigIssueCode};
use mcp_application::OrchestratorParams;
use mcp_domain::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw `[orchestrator.retry]` table: the policy for steps that declare none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_attempts: u32,
    pub backoff_multiplier: f64,
    pub initial_delay_ms: u64,
    pub max_delay_ms: Option<u64>,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff_multiplier: 2.0,
            initial_delay_ms: 1000,
            max_delay_ms: None,
        }
    }
}

impl FileRetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(
            self.max_attempts,
            self.backoff_multiplier,
            Duration::from_millis(self.initial_delay_ms),
        );
        match self.max_delay_ms {
            Some(ms) => policy.with_max_delay(Duration::from_millis(ms)),
            None => policy,
        }
    }
}

/// Raw orchestrator configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    pub retry: FileRetryConfig,
    /// Per-attempt timeout for steps that declare none
    pub step_timeout_ms: Option<u64>,
}

impl FileOrchestratorConfig {
    pub fn to_params(&self) -> OrchestratorParams {
        OrchestratorParams::default()
            .with_default_retry(self.retry.to_policy())
            .with_step_timeout(self.step_timeout_ms.map(Duration::from_millis))
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.retry.max_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidValue {
                    field: "orchestrator.retry.max_attempts".to_string(),
                },
                "orchestrator.retry.max_attempts must be at least 1",
            ));
        }
        if self.retry.backoff_multiplier < 1.0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidValue {
                    field: "orchestrator.retry.backoff_multiplier".to_string(),
                },
                format!(
                    "orchestrator.retry.backoff_multiplier must be >= 1.0, got {}",
                    self.retry.backoff_multiplier
                ),
            ));
        }
        if self.step_timeout_ms == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidValue {
                    field: "orchestrator.step_timeout_ms".to_string(),
                },
                "orchestrator.step_timeout_ms must be greater than zero",
            ));
        }
        issues
    }
}
