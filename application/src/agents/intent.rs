//! Request classification.

use super::context::AgentContext;
use super::contract::Agent;
use crate::ports::llm_gateway::LlmCallConfig;
use async_trait::async_trait;
use mcp_domain::core::string::preview;
use mcp_domain::{Mcp, PromptTemplate, Step, StepAction, StepOutput, StepResult, extract_json};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntentReply {
    problem_type: String,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    summary: String,
}

/// Classifies the business request and records the problem type and
/// industry on the document context.
///
/// The request comes from the step's `config.request`, falling back to its
/// description.
pub struct IntentAgent {
    config: LlmCallConfig,
}

impl Default for IntentAgent {
    fn default() -> Self {
        Self::new(LlmCallConfig::default())
    }
}

impl IntentAgent {
    pub fn new(config: LlmCallConfig) -> Self {
        Self {
            config: config.with_system_prompt(PromptTemplate::intent_system()),
        }
    }
}

#[async_trait]
impl Agent for IntentAgent {
    fn name(&self) -> &str {
        "intent_agent"
    }

    fn actions(&self) -> Vec<StepAction> {
        vec![StepAction::InterpretIntent]
    }

    async fn run(&self, step: &Step, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult {
        let request = step
            .config_str("request")
            .or(step.description.as_deref())
            .unwrap_or_default();
        if request.trim().is_empty() {
            return StepResult::failure("No request to interpret");
        }

        let reply = match ctx
            .services
            .llm
            .call(&PromptTemplate::intent_prompt(request), Some(&self.config))
            .await
        {
            Ok(reply) => reply,
            Err(e) => return StepResult::failure(format!("LLM call failed: {}", e)),
        };

        let Some(intent) = extract_json::<IntentReply>(&reply.content) else {
            return StepResult::failure("Could not parse intent from response")
                .with_thought(preview(&reply.content, 200));
        };

        debug!(
            "Intent: problem_type={}, industry={:?}",
            intent.problem_type, intent.industry
        );

        mcp.context.problem_type = intent.problem_type.clone();
        if let Some(industry) = intent.industry.as_ref().filter(|i| !i.is_empty()) {
            mcp.context.industry = industry.clone();
        }
        mcp.touch();

        StepResult::success(StepOutput::Intent {
            problem_type: intent.problem_type,
            industry: intent.industry,
            summary: intent.summary,
        })
        .with_thought(reply.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{ScriptedLlm, services};
    use mcp_domain::McpBuilder;
    use tokio_util::sync::CancellationToken;

    fn doc() -> Mcp {
        McpBuilder::new("s1")
            .add_intent_step("intent", "Cut delivery costs across our depots")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_writes_problem_type_and_industry() {
        let llm = ScriptedLlm::new([
            "```json\n{\"problemType\": \"vehicle_routing\", \"industry\": \"logistics\", \"summary\": \"Route trucks\"}\n```",
        ]);
        let services = services(llm.clone());
        let mut mcp = doc();
        let step = mcp.protocol.steps[0].clone();
        let before = mcp.last_modified();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = IntentAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(result.success);
        assert_eq!(mcp.context.problem_type, "vehicle_routing");
        assert_eq!(mcp.context.industry, "logistics");
        assert!(mcp.last_modified() >= before);
        assert!(llm.prompts.lock().unwrap()[0].contains("Cut delivery costs"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_fails() {
        let services = services(ScriptedLlm::new(["It is probably a routing problem."]));
        let mut mcp = doc();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = IntentAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(!result.success);
        assert!(mcp.context.problem_type.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_error_becomes_failure() {
        let services = services(ScriptedLlm::failing());
        let mut mcp = doc();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = IntentAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(result.error.unwrap().contains("model offline"));
    }
}
