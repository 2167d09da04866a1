//! Solver service port

use async_trait::async_trait;
use mcp_domain::{SolveRequest, SolveResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Solver unavailable: {0}")]
    Unavailable(String),

    #[error("Solver request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid solver response: {0}")]
    InvalidResponse(String),
}

/// External optimization solver.
///
/// A returned `SolveResponse` may still report INFEASIBLE/UNBOUNDED/ERROR;
/// `Err` is reserved for transport-level failures.
#[async_trait]
pub trait SolverService: Send + Sync {
    async fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolverError>;
}
