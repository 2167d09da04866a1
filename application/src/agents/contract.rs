//! The agent contract.

use super::context::AgentContext;
use async_trait::async_trait;
use mcp_domain::{Mcp, Step, StepAction, StepResult};

/// A worker that performs one or more step actions.
///
/// `run` reports every internal failure through [`StepResult::failure`];
/// errors from collaborators are converted, never propagated. Agents may
/// mutate the document and should call [`Mcp::touch`] when they do.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Stable identifier recorded in each [`OrchestrationResult`](mcp_domain::OrchestrationResult).
    fn name(&self) -> &str;

    /// Actions this agent handles.
    fn actions(&self) -> Vec<StepAction>;

    async fn run(&self, step: &Step, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult;
}
