//! Model formulation.

use super::context::AgentContext;
use super::contract::Agent;
use crate::ports::llm_gateway::LlmCallConfig;
use async_trait::async_trait;
use mcp_domain::{Mcp, PromptTemplate, Step, StepAction, StepOutput, StepResult, parse_model};
use tracing::info;

/// Asks the LLM for the model wire schema and installs the parsed model
/// into the document, replacing the previous one.
pub struct ModelBuilderAgent {
    config: LlmCallConfig,
}

impl Default for ModelBuilderAgent {
    fn default() -> Self {
        Self::new(LlmCallConfig::default())
    }
}

impl ModelBuilderAgent {
    pub fn new(config: LlmCallConfig) -> Self {
        Self {
            config: config.with_system_prompt(PromptTemplate::model_system()),
        }
    }
}

#[async_trait]
impl Agent for ModelBuilderAgent {
    fn name(&self) -> &str {
        "model_builder"
    }

    fn actions(&self) -> Vec<StepAction> {
        vec![StepAction::BuildModel]
    }

    async fn run(&self, _step: &Step, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult {
        let prompt = PromptTemplate::model_prompt(
            &mcp.context.problem_type,
            &mcp.context.industry,
            &mcp.model,
            &ctx.collected_fields(),
        );

        let reply = match ctx.services.llm.call(&prompt, Some(&self.config)).await {
            Ok(reply) => reply,
            Err(e) => return StepResult::failure(format!("LLM call failed: {}", e)),
        };

        let model = match parse_model(&reply.content) {
            Ok(model) => model,
            Err(e) => return StepResult::failure(e.to_string()).with_thought(reply.content),
        };

        info!(
            "Model: {} variable(s), {} constraint(s)",
            model.variables.len(),
            model.constraints.len()
        );
        let output = StepOutput::ModelBuilt {
            variables: model.variables.len(),
            constraints: model.constraints.len(),
            has_objective: model.objective.is_some(),
        };
        mcp.model = model;
        mcp.touch();

        StepResult::success(output).with_thought(reply.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{ScriptedLlm, services};
    use mcp_domain::{McpBuilder, ObjectiveType};
    use tokio_util::sync::CancellationToken;

    fn doc() -> Mcp {
        McpBuilder::new("s1")
            .add_model_step("build", StepAction::BuildModel)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_installs_parsed_model() {
        let services = services(ScriptedLlm::new([r#"Here you go:
```json
{
  "variables": [{"name": "x", "type": "INTEGER", "min": 0, "max": 10}],
  "constraints": [{"name": "cap", "expression": "x <= 5", "type": "LESS_THAN"}],
  "objective": {"type": "MAXIMIZE", "expression": "x"}
}
```"#]));
        let mut mcp = doc();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = ModelBuilderAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(result.success);
        assert_eq!(
            result.output,
            Some(StepOutput::ModelBuilt {
                variables: 1,
                constraints: 1,
                has_objective: true
            })
        );
        assert_eq!(
            mcp.model.objective.as_ref().unwrap().objective_type,
            ObjectiveType::Maximize
        );
    }

    #[tokio::test]
    async fn test_invalid_model_leaves_document_untouched() {
        let services = services(ScriptedLlm::new([r#"{"variables": []}"#]));
        let mut mcp = doc();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = ModelBuilderAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("no variables"));
        assert!(mcp.model.is_empty());
    }
}
