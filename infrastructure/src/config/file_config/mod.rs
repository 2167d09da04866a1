//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application parameters.

mod approval;
mod debate;
mod llm;
mod logging;
mod orchestrator;
mod solver;
mod storage;

pub use approval::{ApprovalPolicy, FileApprovalConfig};
pub use debate::FileDebateConfig;
pub use llm::{FileLlmConfig, LlmProvider};
pub use logging::FileLoggingConfig;
pub use orchestrator::{FileOrchestratorConfig, FileRetryConfig};
pub use solver::FileSolverConfig;
pub use storage::FileStorageConfig;

use mcp_domain::Severity;
use serde::{Deserialize, Serialize};

/// Identifies a specific configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    InvalidValue { field: String },
    UnknownStrategy { value: String },
    MissingValue { field: String },
}

/// A detected problem in the loaded configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub(crate) fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub(crate) fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Step loop defaults
    pub orchestrator: FileOrchestratorConfig,
    /// Debate rounds, deadline and verdict rule
    pub debate: FileDebateConfig,
    /// Language model endpoint
    pub llm: FileLlmConfig,
    /// Solver endpoint
    pub solver: FileSolverConfig,
    /// Where results and data sources live
    pub storage: FileStorageConfig,
    /// Log files
    pub logging: FileLoggingConfig,
    /// Answers to review requests
    pub approval: FileApprovalConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.orchestrator.validate());
        issues.extend(self.debate.validate());
        issues.extend(self.llm.validate());
        issues.extend(self.solver.validate());
        issues.extend(self.approval.validate());
        issues
    }
}
