//! Agents: the workers that execute protocol steps.
//!
//! Each agent declares the [`StepAction`](mcp_domain::StepAction)s it handles
//! and is registered once in an [`AgentRegistry`]. The orchestrator resolves
//! every step through the registry and hands the agent an [`AgentContext`]
//! carrying the injected collaborators.
//!
//! | Agent | Actions |
//! |-------|---------|
//! | [`IntentAgent`] | `interpret_intent` |
//! | [`DataAgent`] | `collect_data`, `map_data` |
//! | [`ModelBuilderAgent`] | `build_model` |
//! | [`SolverAgent`] | `solve_model` |
//! | [`ExplanationAgent`] | `explain_solution` |
//! | [`CritiqueAgent`] | `critique_solution` |
//! | [`DebateAgent`] | `debate_solution` |
//! | [`HumanReviewAgent`] | `human_review` |

pub mod context;
pub mod contract;
pub mod critique;
pub mod data;
pub mod debate;
pub mod explanation;
pub mod intent;
pub mod model_builder;
pub mod registry;
pub mod review;
pub mod solver;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{AgentContext, AgentServices};
pub use contract::Agent;
pub use critique::CritiqueAgent;
pub use data::DataAgent;
pub use debate::DebateAgent;
pub use explanation::ExplanationAgent;
pub use intent::IntentAgent;
pub use model_builder::ModelBuilderAgent;
pub use registry::{AgentRegistry, RegistryError};
pub use review::HumanReviewAgent;
pub use solver::SolverAgent;

use crate::debate::DebateRequester;
use crate::ports::llm_gateway::LlmCallConfig;
use std::sync::Arc;

/// Registry with one agent per built-in action.
pub fn default_registry(
    llm_config: LlmCallConfig,
    default_solver: &str,
    debate: DebateRequester,
) -> Result<AgentRegistry, RegistryError> {
    AgentRegistry::new()
        .with_agent(Arc::new(IntentAgent::new(llm_config.clone())))?
        .with_agent(Arc::new(DataAgent::new(llm_config.clone())))?
        .with_agent(Arc::new(ModelBuilderAgent::new(llm_config.clone())))?
        .with_agent(Arc::new(SolverAgent::new(default_solver)))?
        .with_agent(Arc::new(ExplanationAgent::new(llm_config.clone())))?
        .with_agent(Arc::new(CritiqueAgent::new(llm_config.clone())))?
        .with_agent(Arc::new(DebateAgent::new(debate)))?
        .with_agent(Arc::new(HumanReviewAgent::new(llm_config)))
}
