//! Orchestrator parameters: step loop control.

use mcp_domain::{RetryPolicy, Step};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters for [`Orchestrator`](crate::use_cases::orchestrate::Orchestrator).
///
/// A step's own `retryPolicy` and `timeout` win over these defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorParams {
    /// Retry policy for steps that declare none.
    pub default_retry: RetryPolicy,
    /// Per-attempt timeout for steps that declare none.
    pub step_timeout: Option<Duration>,
}

impl Default for OrchestratorParams {
    fn default() -> Self {
        Self {
            default_retry: RetryPolicy::no_retry(),
            step_timeout: None,
        }
    }
}

impl OrchestratorParams {
    // ==================== Builder Methods ====================

    pub fn with_default_retry(mut self, policy: RetryPolicy) -> Self {
        self.default_retry = policy;
        self
    }

    pub fn with_step_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.step_timeout = timeout;
        self
    }

    // ==================== Resolution ====================

    pub fn retry_for<'a>(&'a self, step: &'a Step) -> &'a RetryPolicy {
        step.retry_policy.as_ref().unwrap_or(&self.default_retry)
    }

    pub fn timeout_for(&self, step: &Step) -> Option<Duration> {
        step.timeout().or(self.step_timeout)
    }
}
