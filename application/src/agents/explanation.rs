//! Solution explanation.

use super::context::AgentContext;
use super::contract::Agent;
use crate::ports::llm_gateway::LlmCallConfig;
use async_trait::async_trait;
use mcp_domain::{Mcp, PromptTemplate, Step, StepAction, StepOutput, StepResult};

/// Explains the latest solution in business terms.
///
/// A no-op success when the protocol disables explainability.
#[derive(Default)]
pub struct ExplanationAgent {
    config: LlmCallConfig,
}

impl ExplanationAgent {
    pub fn new(config: LlmCallConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Agent for ExplanationAgent {
    fn name(&self) -> &str {
        "explanation_agent"
    }

    fn actions(&self) -> Vec<StepAction> {
        vec![StepAction::ExplainSolution]
    }

    async fn run(&self, step: &Step, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult {
        if !mcp.protocol.explainability_enabled {
            return StepResult::success(StepOutput::Skipped {
                reason: "explainability disabled".to_string(),
            });
        }
        let Some(solution) = ctx.latest_solution() else {
            return StepResult::failure("No solution to explain");
        };
        let solution = match serde_json::to_string_pretty(solution) {
            Ok(json) => json,
            Err(e) => return StepResult::failure(e.to_string()),
        };
        let format = step.config_str("format").unwrap_or("business");

        match ctx
            .services
            .llm
            .call(
                &PromptTemplate::explanation_prompt(&solution, format),
                Some(&self.config),
            )
            .await
        {
            Ok(reply) => StepResult::success(StepOutput::Explanation {
                text: reply.content,
            }),
            Err(e) => StepResult::failure(format!("LLM call failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{ScriptedLlm, services};
    use mcp_domain::{McpBuilder, OrchestrationResult, SolveResponse};
    use tokio_util::sync::CancellationToken;

    fn solved() -> Vec<OrchestrationResult> {
        vec![OrchestrationResult::new(
            "solve",
            StepAction::SolveModel,
            Some("solver_agent".to_string()),
            StepResult::success(StepOutput::Solution(SolveResponse::optimal(
                42.0,
                Default::default(),
            ))),
            1,
        )]
    }

    #[tokio::test]
    async fn test_skipped_when_explainability_disabled() {
        let llm = ScriptedLlm::new(Vec::<&str>::new());
        let services = services(llm.clone());
        let mut mcp = McpBuilder::new("s1")
            .add_explanation_step("explain", "business")
            .explainability(false)
            .build()
            .unwrap();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = ExplanationAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(result.success);
        assert!(matches!(result.output, Some(StepOutput::Skipped { .. })));
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_explains_latest_solution() {
        let llm = ScriptedLlm::new(["Ship from the north depot."]);
        let services = services(llm.clone());
        let mut mcp = McpBuilder::new("s1")
            .add_explanation_step("explain", "technical")
            .build()
            .unwrap();
        let step = mcp.protocol.steps[0].clone();
        let previous = solved();

        let ctx = AgentContext::new(&services, &previous, CancellationToken::new());
        let result = ExplanationAgent::default().run(&step, &mut mcp, &ctx).await;

        assert_eq!(
            result.output,
            Some(StepOutput::Explanation {
                text: "Ship from the north depot.".to_string()
            })
        );
        let prompt = &llm.prompts.lock().unwrap()[0];
        assert!(prompt.contains("technical"));
        assert!(prompt.contains("42"));
    }

    #[tokio::test]
    async fn test_fails_without_solution() {
        let services = services(ScriptedLlm::new(Vec::<&str>::new()));
        let mut mcp = McpBuilder::new("s1")
            .add_explanation_step("explain", "business")
            .build()
            .unwrap();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = ExplanationAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(!result.success);
    }
}
