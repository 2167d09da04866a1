//! Action to agent dispatch table.

use super::contract::Agent;
use mcp_domain::{Mcp, StepAction};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Action '{action}' is already handled by agent '{existing}'")]
    DuplicateAction { action: StepAction, existing: String },
}

/// Built once at startup; read-only afterwards.
#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: HashMap<StepAction, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `agent` for every action it declares.
    ///
    /// Nothing is registered if any of its actions is already taken.
    pub fn register(&mut self, agent: Arc<dyn Agent>) -> Result<(), RegistryError> {
        let actions = agent.actions();
        for action in &actions {
            if let Some(existing) = self.agents.get(action) {
                return Err(RegistryError::DuplicateAction {
                    action: action.clone(),
                    existing: existing.name().to_string(),
                });
            }
        }
        for action in actions {
            debug!("Registry: {} -> {}", action, agent.name());
            self.agents.insert(action, Arc::clone(&agent));
        }
        Ok(())
    }

    pub fn with_agent(mut self, agent: Arc<dyn Agent>) -> Result<Self, RegistryError> {
        self.register(agent)?;
        Ok(self)
    }

    pub fn resolve(&self, action: &StepAction) -> Option<Arc<dyn Agent>> {
        self.agents.get(action).cloned()
    }

    /// Actions in `mcp`'s protocol that no agent handles, in protocol order.
    pub fn validate(&self, mcp: &Mcp) -> Vec<StepAction> {
        let mut unknown: Vec<StepAction> = Vec::new();
        for step in &mcp.protocol.steps {
            if !self.agents.contains_key(&step.action) && !unknown.contains(&step.action) {
                unknown.push(step.action.clone());
            }
        }
        unknown
    }

    /// Registered actions, sorted by name.
    pub fn actions(&self) -> Vec<&StepAction> {
        let mut actions: Vec<&StepAction> = self.agents.keys().collect();
        actions.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        actions
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::context::AgentContext;
    use async_trait::async_trait;
    use mcp_domain::{McpBuilder, Step, StepOutput, StepResult};
    use serde_json::json;

    struct Named(&'static str, Vec<StepAction>);

    #[async_trait]
    impl Agent for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn actions(&self) -> Vec<StepAction> {
            self.1.clone()
        }

        async fn run(&self, _step: &Step, _mcp: &mut Mcp, _ctx: &AgentContext<'_>) -> StepResult {
            StepResult::success(StepOutput::Custom { data: json!(null) })
        }
    }

    #[test]
    fn test_resolve_registered_actions() {
        let registry = AgentRegistry::new()
            .with_agent(Arc::new(Named(
                "data",
                vec![StepAction::CollectData, StepAction::MapData],
            )))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.resolve(&StepAction::MapData).unwrap().name(),
            "data"
        );
        assert!(registry.resolve(&StepAction::SolveModel).is_none());
    }

    #[test]
    fn test_duplicate_action_rejected_atomically() {
        let mut registry = AgentRegistry::new();
        registry
            .register(Arc::new(Named("solver", vec![StepAction::SolveModel])))
            .unwrap();

        let err = registry
            .register(Arc::new(Named(
                "greedy",
                vec![StepAction::BuildModel, StepAction::SolveModel],
            )))
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::DuplicateAction {
                action: StepAction::SolveModel,
                existing: "solver".to_string()
            }
        );
        assert!(registry.resolve(&StepAction::BuildModel).is_none());
    }

    #[test]
    fn test_validate_lists_unknown_actions_once() {
        let registry = AgentRegistry::new()
            .with_agent(Arc::new(Named("data", vec![StepAction::CollectData])))
            .unwrap();
        let mcp = McpBuilder::new("s1")
            .add_step("collect", StepAction::CollectData)
            .add_step("forecast_a", "forecast_demand")
            .add_step("forecast_b", "forecast_demand")
            .add_step("solve", StepAction::SolveModel)
            .build()
            .unwrap();

        let unknown = registry.validate(&mcp);
        assert_eq!(
            unknown,
            vec![
                StepAction::Custom("forecast_demand".to_string()),
                StepAction::SolveModel
            ]
        );
    }
}
