//! Model solving through the external solver service.

use super::context::AgentContext;
use super::contract::Agent;
use async_trait::async_trait;
use mcp_domain::{Mcp, SolveRequest, Step, StepAction, StepOutput, StepResult};
use serde_json::Value;
use tracing::{info, warn};

pub const DEFAULT_SOLVER: &str = "cbc";

/// Sends the document's model to the solver service.
///
/// The solver name comes from `config.solver`, then `metadata.solver`, then
/// the agent default. INFEASIBLE, UNBOUNDED and ERROR responses fail the
/// step but keep the response as output so it shows up in the results.
pub struct SolverAgent {
    default_solver: String,
}

impl Default for SolverAgent {
    fn default() -> Self {
        Self::new(DEFAULT_SOLVER)
    }
}

impl SolverAgent {
    pub fn new(default_solver: impl Into<String>) -> Self {
        Self {
            default_solver: default_solver.into(),
        }
    }

    fn request_for(&self, step: &Step, mcp: &Mcp) -> SolveRequest {
        let metadata = mcp.metadata.as_ref();
        let solver = step
            .config_str("solver")
            .map(str::to_string)
            .or_else(|| metadata.and_then(|m| m.solver.clone()))
            .unwrap_or_else(|| self.default_solver.clone());
        let time_limit = step
            .config_value("timeLimit")
            .and_then(Value::as_u64)
            .or_else(|| metadata.and_then(|m| m.time_limit));

        SolveRequest {
            problem: mcp.model.clone(),
            solver,
            time_limit,
        }
    }
}

#[async_trait]
impl Agent for SolverAgent {
    fn name(&self) -> &str {
        "solver_agent"
    }

    fn actions(&self) -> Vec<StepAction> {
        vec![StepAction::SolveModel]
    }

    async fn run(&self, step: &Step, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult {
        let Some(solver) = ctx.services.solver.as_ref() else {
            return StepResult::failure("No solver service configured");
        };
        if mcp.model.variables.is_empty() {
            return StepResult::failure("Model has no variables to solve");
        }

        let request = self.request_for(step, mcp);
        let response = match solver.solve(&request).await {
            Ok(response) => response,
            Err(e) => return StepResult::failure(e.to_string()),
        };

        if response.status.has_solution() {
            info!(
                "Solver '{}': {} objective={:?}",
                request.solver, response.status, response.objective_value
            );
            let thought = format!("{} solution from {}", response.status, request.solver);
            StepResult::success(StepOutput::Solution(response)).with_thought(thought)
        } else {
            warn!("Solver '{}': {}", request.solver, response.status);
            let error = match &response.error {
                Some(detail) => format!("Solver returned {}: {}", response.status, detail),
                None => format!("Solver returned {}", response.status),
            };
            StepResult {
                output: Some(StepOutput::Solution(response)),
                ..StepResult::failure(error)
            }
        }
    }
}
