//! Domain error types

use crate::mcp::value_objects::McpStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Session id must not be empty")]
    EmptySessionId,

    #[error("Duplicate step id: {0}")]
    DuplicateStepId(String),

    #[error("Duplicate variable name: {0}")]
    DuplicateVariable(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: McpStatus, to: McpStatus },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
