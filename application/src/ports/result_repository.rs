//! Result repository port
//!
//! Runs are persisted by session id after they finish. The orchestrator never
//! touches the repository; only use cases do.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mcp_domain::{Mcp, McpStatus, OrchestrationResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("No results stored for session '{0}'")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}

/// Everything known about a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub session_id: String,
    pub status: McpStatus,
    pub results: Vec<OrchestrationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted_at: Option<String>,
    pub mcp: Mcp,
    pub finished_at: DateTime<Utc>,
}

#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Insert or replace the record for `record.session_id`.
    async fn save(&self, record: RunRecord) -> Result<(), RepositoryError>;

    async fn load(&self, session_id: &str) -> Result<RunRecord, RepositoryError>;

    async fn list(&self) -> Result<Vec<String>, RepositoryError>;

    async fn delete(&self, session_id: &str) -> Result<(), RepositoryError>;
}
