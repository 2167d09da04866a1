//! Approval port
//!
//! Where review requests go to be answered by a person, or by a policy
//! standing in for one.

use async_trait::async_trait;
use mcp_domain::{ReviewDecision, ReviewRequest};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApprovalError {
    #[error("Approval channel unavailable: {0}")]
    Unavailable(String),

    #[error("Review {0} was abandoned")]
    Abandoned(String),
}

/// Answers review requests.
///
/// A rejection is a normal `Ok` decision; `Err` means nobody could be asked.
#[async_trait]
pub trait ApprovalService: Send + Sync {
    async fn review(&self, request: &ReviewRequest) -> Result<ReviewDecision, ApprovalError>;
}
