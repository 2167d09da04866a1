//! Solver configuration from TOML (`[solver]` section)

use super::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw solver configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSolverConfig {
    /// Base URL of the solver service; solve steps fail when unset
    pub url: Option<String>,
    /// Solver name used when neither the step nor the document names one
    pub solver: String,
    /// HTTP request timeout
    pub timeout_secs: u64,
}

impl Default for FileSolverConfig {
    fn default() -> Self {
        Self {
            url: None,
            solver: "cbc".to_string(),
            timeout_secs: 120,
        }
    }
}

impl FileSolverConfig {
    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        if self.solver.trim().is_empty() {
            return vec![ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "solver.solver".to_string(),
                },
                "solver.solver must not be empty",
            )];
        }
        Vec::new()
    }
}
