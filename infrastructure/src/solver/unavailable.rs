use async_trait::async_trait;
use mcp_application::{SolverError, SolverService};
use mcp_domain::{SolveRequest, SolveResponse};

/// Stand-in when no solver endpoint is configured; every solve fails.
pub struct UnconfiguredSolver;

#[async_trait]
impl SolverService for UnconfiguredSolver {
    async fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolverError> {
        Err(SolverError::Unavailable(format!(
            "no solver endpoint configured (requested '{}'); set [solver] url",
            request.solver
        )))
    }
}
