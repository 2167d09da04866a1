//! Solution critique.

use super::context::AgentContext;
use super::contract::Agent;
use crate::ports::llm_gateway::LlmCallConfig;
use async_trait::async_trait;
use mcp_domain::{
    Mcp, Message, PromptTemplate, Step, StepAction, StepOutput, StepResult, event_types,
    parse_score,
};
use serde_json::json;
use tracing::debug;

/// Critiques the latest solution and announces the critique on the bus as
/// `critique_ready`, correlated by session id.
pub struct CritiqueAgent {
    config: LlmCallConfig,
}

impl Default for CritiqueAgent {
    fn default() -> Self {
        Self::new(LlmCallConfig::default())
    }
}

impl CritiqueAgent {
    pub fn new(config: LlmCallConfig) -> Self {
        Self {
            config: config.with_system_prompt(PromptTemplate::critique_system()),
        }
    }
}

#[async_trait]
impl Agent for CritiqueAgent {
    fn name(&self) -> &str {
        "critique_agent"
    }

    fn actions(&self) -> Vec<StepAction> {
        vec![StepAction::CritiqueSolution]
    }

    async fn run(&self, _step: &Step, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult {
        let Some(solution) = ctx.latest_solution() else {
            return StepResult::failure("No solution to critique");
        };
        let solution = match serde_json::to_string_pretty(solution) {
            Ok(json) => json,
            Err(e) => return StepResult::failure(e.to_string()),
        };

        let prompt = PromptTemplate::critique_prompt(&solution, ctx.latest_explanation());
        let critique = match ctx.services.llm.call(&prompt, Some(&self.config)).await {
            Ok(reply) => reply.content,
            Err(e) => return StepResult::failure(format!("LLM call failed: {}", e)),
        };
        let score = parse_score(&critique);
        debug!("Critique for {}: score={:?}", mcp.session_id(), score);

        ctx.services.bus.publish(
            Message::new(
                event_types::CRITIQUE_READY,
                json!({ "critique": critique, "score": score }),
                mcp.session_id(),
            )
            .from_agent(self.name()),
        );

        StepResult::success(StepOutput::Critique { critique, score })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{ScriptedLlm, services};
    use mcp_domain::{McpBuilder, OrchestrationResult, SolveResponse};
    use std::sync::{Arc, Mutex};
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_publishes_critique_ready_with_session_id() {
        let services = services(ScriptedLlm::new([
            "Demand is assumed constant.\nScore: 6/10",
        ]));
        let seen: Arc<Mutex<Vec<Message>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = services
            .bus
            .subscribe(event_types::CRITIQUE_READY, move |m| {
                sink.lock().unwrap().push(m.clone());
                Ok(())
            });

        let mut mcp = McpBuilder::new("s-42")
            .add_critique_step("critique")
            .build()
            .unwrap();
        let step = mcp.protocol.steps[0].clone();
        let previous = vec![OrchestrationResult::new(
            "solve",
            StepAction::SolveModel,
            None,
            StepResult::success(StepOutput::Solution(SolveResponse::optimal(
                3.0,
                Default::default(),
            ))),
            1,
        )];

        let ctx = AgentContext::new(&services, &previous, CancellationToken::new());
        let result = CritiqueAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(matches!(
            result.output,
            Some(StepOutput::Critique { score: Some(s), .. }) if s == 6.0
        ));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].correlation_id, "s-42");
        assert_eq!(seen[0].payload["score"], 6.0);
        assert_eq!(seen[0].from.as_deref(), Some("critique_agent"));
    }
}
