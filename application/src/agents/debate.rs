//! Debate step: hands the latest result to the debate subprotocol.

use super::context::AgentContext;
use super::contract::Agent;
use crate::debate::DebateRequester;
use async_trait::async_trait;
use mcp_domain::{Mcp, Step, StepAction, StepOutput, StepResult};

const DEFAULT_TOPIC: &str = "Should this result be accepted as is?";

/// Requests a debate over the step's `config.agentOutput`, or else the latest
/// explanation or solution, and waits for the verdict.
///
/// The topic comes from `config.topic`, then the step description.
pub struct DebateAgent {
    requester: DebateRequester,
}

impl DebateAgent {
    pub fn new(requester: DebateRequester) -> Self {
        Self { requester }
    }

    fn subject(step: &Step, ctx: &AgentContext<'_>) -> Option<String> {
        if let Some(output) = step.config_str("agentOutput") {
            return Some(output.to_string());
        }
        if let Some(explanation) = ctx.latest_explanation() {
            return Some(explanation.to_string());
        }
        ctx.latest_solution()
            .and_then(|solution| serde_json::to_string_pretty(solution).ok())
    }
}

#[async_trait]
impl Agent for DebateAgent {
    fn name(&self) -> &str {
        "debate_agent"
    }

    fn actions(&self) -> Vec<StepAction> {
        vec![StepAction::DebateSolution]
    }

    async fn run(&self, step: &Step, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult {
        let Some(subject) = Self::subject(step, ctx) else {
            return StepResult::failure("Nothing to debate: no output, explanation or solution");
        };
        let topic = step
            .config_str("topic")
            .or(step.description.as_deref())
            .unwrap_or(DEFAULT_TOPIC);

        let outcome = tokio::select! {
            _ = ctx.cancellation.cancelled() => {
                return StepResult::failure("Debate cancelled");
            }
            outcome = self.requester.request(mcp.session_id(), topic, &subject) => outcome,
        };

        match outcome {
            Ok(session) => {
                let thought = session.summary.clone().unwrap_or_default();
                StepResult::success(StepOutput::Debate(session)).with_thought(thought)
            }
            Err(e) => StepResult::failure(e.to_string()),
        }
    }
}
