//! Submit use case: validate, run and store one document.

use super::orchestrate::Orchestrator;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::result_repository::{RepositoryError, ResultRepository, RunRecord};
use chrono::Utc;
use mcp_domain::{Mcp, McpStatus, McpValidator, OrchestrationResult, StepAction, ValidationIssue};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Invalid MCP: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("No agent registered for action(s): {}", .0.join(", "))]
    UnknownActions(Vec<String>),

    #[error("Failed to store results: {0}")]
    Repository(#[from] RepositoryError),
}

/// Structural issues plus actions no agent handles.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub unknown_actions: Vec<StepAction>,
}

impl ValidationReport {
    pub fn errors(&self) -> Vec<String> {
        self.issues
            .iter()
            .filter(|issue| issue.is_error())
            .map(|issue| issue.message.clone())
            .collect()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }

    /// Whether the document may be submitted.
    pub fn is_runnable(&self) -> bool {
        self.unknown_actions.is_empty() && !self.issues.iter().any(ValidationIssue::is_error)
    }
}

/// Result of a submission. A run aborted by a required step is still a
/// successful submission: `status` is `failed` and `aborted_at` names the step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutput {
    pub session_id: String,
    pub status: McpStatus,
    pub results: Vec<OrchestrationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted_at: Option<String>,
}

pub struct SubmitMcpUseCase<R: ResultRepository + ?Sized> {
    orchestrator: Arc<Orchestrator>,
    repository: Arc<R>,
}

impl<R: ResultRepository + ?Sized> SubmitMcpUseCase<R> {
    pub fn new(orchestrator: Arc<Orchestrator>, repository: Arc<R>) -> Self {
        Self {
            orchestrator,
            repository,
        }
    }

    pub fn validate(&self, mcp: &Mcp) -> ValidationReport {
        ValidationReport {
            issues: McpValidator::validate(mcp),
            unknown_actions: self.orchestrator.registry().validate(mcp),
        }
    }

    /// Submit with default (no-op) progress.
    pub async fn submit(&self, mcp: Mcp) -> Result<SubmitOutput, SubmitError> {
        self.submit_with_progress(mcp, &NoProgress).await
    }

    /// Validate, run to a terminal status, then store the run.
    ///
    /// Nothing runs if validation fails.
    pub async fn submit_with_progress(
        &self,
        mut mcp: Mcp,
        progress: &dyn ProgressNotifier,
    ) -> Result<SubmitOutput, SubmitError> {
        let report = self.validate(&mcp);
        let errors = report.errors();
        if !errors.is_empty() {
            return Err(SubmitError::Validation(errors));
        }
        if !report.unknown_actions.is_empty() {
            return Err(SubmitError::UnknownActions(
                report
                    .unknown_actions
                    .iter()
                    .map(|a| a.as_str().to_string())
                    .collect(),
            ));
        }

        let run = self.orchestrator.run_with_progress(&mut mcp, progress).await;

        let record = RunRecord {
            session_id: run.session_id.clone(),
            status: run.status,
            results: run.results.clone(),
            aborted_at: run.aborted_at.clone(),
            mcp,
            finished_at: Utc::now(),
        };
        self.repository.save(record).await?;
        info!("Stored results for session {}", run.session_id);

        Ok(SubmitOutput {
            session_id: run.session_id,
            status: run.status,
            results: run.results,
            aborted_at: run.aborted_at,
        })
    }
}
