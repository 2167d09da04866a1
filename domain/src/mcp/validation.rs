//! Structural validation of MCP documents.
//!
//! The builder rejects the most common mistakes eagerly, but documents also
//! arrive as JSON. [`McpValidator`] inspects a document and returns every
//! detected problem as a [`ValidationIssue`] with a severity, so callers can
//! refuse on errors and merely log warnings.

use super::entities::Mcp;
use super::value_objects::{McpStatus, StepAction};
use std::collections::HashSet;

/// Severity level of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The document cannot be executed.
    Error,
    /// Executable, but probably not what the author meant.
    Warning,
}

/// Identifies a specific validation issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssueCode {
    EmptySessionId,
    AlreadyFinished { status: McpStatus },
    EmptyProtocol,
    DuplicateStepId { step: String },
    EmptyStepId,
    DuplicateVariable { variable: String },
    InvertedBounds { variable: String },
    TimestampsOutOfOrder,
    InvalidRetryPolicy { step: String },
    ZeroTimeout { step: String },
    SolveBeforeBuild { step: String },
    UnknownApprovalStep { step: String },
    ApprovalGatesDisabled,
}

/// A detected problem in a document.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: ValidationIssueCode,
    pub message: String,
}

impl ValidationIssue {
    fn error(code: ValidationIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    fn warning(code: ValidationIssueCode, message: impl Into<String>) -> Self {
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

/// Validates documents before execution.
pub struct McpValidator;

impl McpValidator {
    pub fn validate(mcp: &Mcp) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if mcp.session_id().trim().is_empty() {
            issues.push(ValidationIssue::error(
                ValidationIssueCode::EmptySessionId,
                "sessionId must not be empty",
            ));
        }

        // A finished run cannot be replayed under the same session.
        if mcp.status().is_terminal() {
            issues.push(ValidationIssue::error(
                ValidationIssueCode::AlreadyFinished {
                    status: mcp.status(),
                },
                format!(
                    "document is already {}; submit it under a new sessionId",
                    mcp.status()
                ),
            ));
        }

        if mcp.last_modified() < mcp.created() {
            issues.push(ValidationIssue::error(
                ValidationIssueCode::TimestampsOutOfOrder,
                "lastModified is earlier than created",
            ));
        }

        Self::check_variables(mcp, &mut issues);
        Self::check_steps(mcp, &mut issues);
        Self::check_approvals(mcp, &mut issues);

        issues
    }

    /// Only the error-severity messages; empty means the document may run.
    pub fn errors(mcp: &Mcp) -> Vec<String> {
        Self::validate(mcp)
            .into_iter()
            .filter(ValidationIssue::is_error)
            .map(|issue| issue.message)
            .collect()
    }

    fn check_variables(mcp: &Mcp, issues: &mut Vec<ValidationIssue>) {
        let mut seen = HashSet::new();
        for variable in &mcp.model.variables {
            if !seen.insert(variable.name.as_str()) {
                issues.push(ValidationIssue::error(
                    ValidationIssueCode::DuplicateVariable {
                        variable: variable.name.clone(),
                    },
                    format!("variable '{}' is declared more than once", variable.name),
                ));
            }
            if let (Some(min), Some(max)) = (variable.min, variable.max)
                && min > max
            {
                issues.push(ValidationIssue::error(
                    ValidationIssueCode::InvertedBounds {
                        variable: variable.name.clone(),
                    },
                    format!(
                        "variable '{}' has min {} greater than max {}",
                        variable.name, min, max
                    ),
                ));
            }
        }
    }

    fn check_steps(mcp: &Mcp, issues: &mut Vec<ValidationIssue>) {
        let steps = &mcp.protocol.steps;
        if steps.is_empty() {
            issues.push(ValidationIssue::error(
                ValidationIssueCode::EmptyProtocol,
                "protocol has no steps",
            ));
            return;
        }

        let mut seen = HashSet::new();
        let mut model_built = false;
        for step in steps {
            if step.id.trim().is_empty() {
                issues.push(ValidationIssue::error(
                    ValidationIssueCode::EmptyStepId,
                    format!("a '{}' step has an empty id", step.action),
                ));
            } else if !seen.insert(step.id.as_str()) {
                issues.push(ValidationIssue::error(
                    ValidationIssueCode::DuplicateStepId {
                        step: step.id.clone(),
                    },
                    format!("step id '{}' is used more than once", step.id),
                ));
            }

            if let Some(policy) = &step.retry_policy
                && (policy.max_attempts == 0 || policy.backoff_multiplier < 1.0)
            {
                issues.push(ValidationIssue::error(
                    ValidationIssueCode::InvalidRetryPolicy {
                        step: step.id.clone(),
                    },
                    format!(
                        "step '{}': retry policy needs maxAttempts >= 1 and backoffMultiplier >= 1",
                        step.id
                    ),
                ));
            }

            if step.timeout_ms == Some(0) {
                issues.push(ValidationIssue::error(
                    ValidationIssueCode::ZeroTimeout {
                        step: step.id.clone(),
                    },
                    format!("step '{}': timeout must be greater than zero", step.id),
                ));
            }

            match step.action {
                StepAction::BuildModel => model_built = true,
                StepAction::SolveModel if !model_built && mcp.model.is_empty() => {
                    issues.push(ValidationIssue::warning(
                        ValidationIssueCode::SolveBeforeBuild {
                            step: step.id.clone(),
                        },
                        format!(
                            "step '{}' solves before any build_model step and the model is empty",
                            step.id
                        ),
                    ));
                }
                _ => {}
            }
        }
    }

    fn check_approvals(mcp: &Mcp, issues: &mut Vec<ValidationIssue>) {
        let hitl = &mcp.protocol.human_in_the_loop;
        if hitl.approval_steps.is_empty() {
            return;
        }
        if !hitl.required {
            issues.push(ValidationIssue::warning(
                ValidationIssueCode::ApprovalGatesDisabled,
                "approvalSteps are listed but humanInTheLoop.required is false; no step will wait for approval",
            ));
        }
        for id in &hitl.approval_steps {
            if mcp.step(id).is_none() {
                issues.push(ValidationIssue::warning(
                    ValidationIssueCode::UnknownApprovalStep { step: id.clone() },
                    format!("approval step '{}' is not in the protocol", id),
                ));
            }
        }
    }
}
