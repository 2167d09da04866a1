//! Human review and approval gates.

use super::context::{AgentContext, AgentServices};
use super::contract::Agent;
use crate::ports::approval::ApprovalError;
use crate::ports::llm_gateway::LlmCallConfig;
use async_trait::async_trait;
use mcp_domain::{
    Mcp, Message, PromptTemplate, ReviewDecision, ReviewKind, ReviewRequest, Step, StepAction,
    StepOutput, StepResult, event_types, extract_json,
};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

/// Send `request` to the approval service and announce it on the bus.
///
/// Publishes `review_requested` before asking and `review_decided` once an
/// answer arrives, both correlated by session id.
pub(crate) async fn ask_reviewer(
    services: &AgentServices,
    request: &ReviewRequest,
) -> Result<ReviewDecision, ApprovalError> {
    let Some(approval) = services.approval.as_ref() else {
        return Err(ApprovalError::Unavailable(
            "no approval service configured".to_string(),
        ));
    };

    services.bus.publish(Message::new(
        event_types::REVIEW_REQUESTED,
        json!({
            "reviewId": request.id,
            "kind": request.kind,
            "step": request.step_id,
        }),
        &request.session_id,
    ));
    let decision = approval.review(request).await?;
    info!(
        "{} {} for step '{}': {}",
        request.kind,
        request.id,
        request.step_id,
        approval_word(&decision)
    );
    services.bus.publish(Message::new(
        event_types::REVIEW_DECIDED,
        json!({
            "reviewId": request.id,
            "approved": decision.approved,
            "feedback": decision.feedback,
        }),
        &request.session_id,
    ));
    Ok(decision)
}

/// Handles `human_review` steps.
///
/// The reviewer sees the problem context, the step's `config` and the latest
/// solution and explanation. With `config.summarize` set, an LLM summary is
/// attached to the request first. A rejection fails the step and keeps the
/// decision as output.
pub struct HumanReviewAgent {
    config: LlmCallConfig,
}

impl Default for HumanReviewAgent {
    fn default() -> Self {
        Self::new(LlmCallConfig::default())
    }
}

impl HumanReviewAgent {
    pub fn new(config: LlmCallConfig) -> Self {
        Self { config }
    }

    fn review_data(step: &Step, mcp: &Mcp, ctx: &AgentContext<'_>) -> Value {
        let mut data = Map::new();
        data.insert("problemType".to_string(), json!(mcp.context.problem_type));
        data.insert("industry".to_string(), json!(mcp.context.industry));
        if let Some(solution) = ctx.latest_solution() {
            data.insert("solution".to_string(), json!(solution));
        }
        if let Some(explanation) = ctx.latest_explanation() {
            data.insert("explanation".to_string(), json!(explanation));
        }
        if let Some(Value::Object(config)) = &step.config {
            for (key, value) in config {
                if key != "summarize" {
                    data.insert(key.clone(), value.clone());
                }
            }
        }
        Value::Object(data)
    }

    async fn summarize(&self, data: &Value, ctx: &AgentContext<'_>) -> Option<String> {
        let prompt = PromptTemplate::review_prompt(&data.to_string());
        let reply = match ctx.services.llm.call(&prompt, Some(&self.config)).await {
            Ok(reply) => reply.content,
            Err(e) => {
                warn!("Review summary failed: {}", e);
                return None;
            }
        };
        let parsed: Value = extract_json(&reply)?;
        let summary = parsed.get("summary")?.as_str()?.to_string();
        let concerns: Vec<&str> = parsed
            .get("concerns")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if concerns.is_empty() {
            Some(summary)
        } else {
            Some(format!("{} Concerns: {}", summary, concerns.join("; ")))
        }
    }
}

#[async_trait]
impl Agent for HumanReviewAgent {
    fn name(&self) -> &str {
        "human_review_agent"
    }

    fn actions(&self) -> Vec<StepAction> {
        vec![StepAction::HumanReview]
    }

    async fn run(&self, step: &Step, mcp: &mut Mcp, ctx: &AgentContext<'_>) -> StepResult {
        let mut data = Self::review_data(step, mcp, ctx);
        let wants_summary = step
            .config_value("summarize")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let summary = if wants_summary {
            self.summarize(&data, ctx).await
        } else {
            None
        };
        if let (Some(summary), Value::Object(map)) = (&summary, &mut data) {
            map.insert("summary".to_string(), json!(summary));
        }

        let request = ReviewRequest::new(ReviewKind::Review, mcp.session_id(), &step.id, data)
            .with_description(step.description.clone());
        debug!("Review {} requested for step '{}'", request.id, step.id);

        let decision = match ask_reviewer(ctx.services, &request).await {
            Ok(decision) => decision,
            Err(e) => return StepResult::failure(e.to_string()),
        };

        let thought = format!("Review {} {}", request.id, approval_word(&decision));
        let output = StepOutput::Review {
            review_id: request.id,
            approved: decision.approved,
            feedback: decision.feedback.clone(),
            summary,
        };
        if decision.approved {
            StepResult::success(output).with_thought(thought)
        } else {
            let error = match &decision.feedback {
                Some(feedback) => format!("Review rejected: {}", feedback),
                None => "Review rejected".to_string(),
            };
            StepResult {
                output: Some(output),
                ..StepResult::failure(error)
            }
            .with_thought(thought)
        }
    }
}

fn approval_word(decision: &ReviewDecision) -> &'static str {
    if decision.approved {
        "approved"
    } else {
        "rejected"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{MockApproval, ScriptedLlm, services};
    use mcp_domain::{McpBuilder, OrchestrationResult, SolveResponse};
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use tokio_util::sync::CancellationToken;

    fn doc() -> Mcp {
        McpBuilder::new("s1")
            .problem_type("routing")
            .push_step(
                Step::new("review", StepAction::HumanReview)
                    .with_description("Sign off the routes")
                    .with_config(json!({"owner": "ops"})),
            )
            .build()
            .unwrap()
    }

    fn solved() -> Vec<OrchestrationResult> {
        vec![OrchestrationResult::new(
            "solve",
            StepAction::SolveModel,
            Some("solver_agent".to_string()),
            StepResult::success(StepOutput::Solution(SolveResponse::optimal(
                12.0,
                BTreeMap::from([("x".to_string(), 3.0)]),
            ))),
            1,
        )]
    }

    #[tokio::test]
    async fn test_approved_review_succeeds() {
        let approval = MockApproval::answering(ReviewDecision::approve().with_feedback("ok"));
        let services =
            services(ScriptedLlm::new(Vec::<&str>::new())).with_approval(approval.clone());
        let mut mcp = doc();
        let step = mcp.protocol.steps[0].clone();
        let previous = solved();

        let ctx = AgentContext::new(&services, &previous, CancellationToken::new());
        let result = HumanReviewAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(result.success);
        let requests = approval.requests.lock().unwrap();
        assert_eq!(requests[0].kind, ReviewKind::Review);
        assert_eq!(requests[0].step_id, "review");
        assert_eq!(requests[0].description.as_deref(), Some("Sign off the routes"));
        assert_eq!(requests[0].data["problemType"], "routing");
        assert_eq!(requests[0].data["owner"], "ops");
        assert_eq!(requests[0].data["solution"]["objectiveValue"], 12.0);
        assert!(matches!(
            result.output,
            Some(StepOutput::Review { approved: true, .. })
        ));
    }

    #[tokio::test]
    async fn test_rejected_review_fails_with_feedback() {
        let approval = MockApproval::answering(ReviewDecision::reject("too many trucks"));
        let services = services(ScriptedLlm::new(Vec::<&str>::new())).with_approval(approval);
        let mut mcp = doc();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = HumanReviewAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Review rejected: too many trucks")
        );
        assert!(matches!(
            result.output,
            Some(StepOutput::Review { approved: false, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_approval_service_fails() {
        let services = services(ScriptedLlm::new(Vec::<&str>::new()));
        let mut mcp = doc();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = HumanReviewAgent::default().run(&step, &mut mcp, &ctx).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("no approval service"));
    }

    #[tokio::test]
    async fn test_summary_attached_when_requested() {
        let approval = MockApproval::answering(ReviewDecision::approve());
        let llm = ScriptedLlm::new([
            r#"{"summary": "Three routes cover all depots.", "concerns": ["depot C is tight"]}"#,
        ]);
        let services = services(llm).with_approval(approval.clone());
        let mut mcp = McpBuilder::new("s1")
            .push_step(
                Step::new("review", StepAction::HumanReview)
                    .with_config(json!({"summarize": true})),
            )
            .build()
            .unwrap();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        let result = HumanReviewAgent::default().run(&step, &mut mcp, &ctx).await;

        let expected = "Three routes cover all depots. Concerns: depot C is tight";
        assert_eq!(approval.requests.lock().unwrap()[0].data["summary"], expected);
        assert!(approval.requests.lock().unwrap()[0].data.get("summarize").is_none());
        match result.output {
            Some(StepOutput::Review { summary, .. }) => {
                assert_eq!(summary.as_deref(), Some(expected))
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_review_events_published_in_order() {
        let approval = MockApproval::answering(ReviewDecision::approve());
        let services = services(ScriptedLlm::new(Vec::<&str>::new())).with_approval(approval);
        let seen: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = services.bus.subscribe(event_types::WILDCARD, move |m| {
            sink.lock()
                .unwrap()
                .push((m.message_type.clone(), m.correlation_id.clone()));
            Ok(())
        });
        let mut mcp = doc();
        let step = mcp.protocol.steps[0].clone();

        let ctx = AgentContext::new(&services, &[], CancellationToken::new());
        HumanReviewAgent::default().run(&step, &mut mcp, &ctx).await;

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (event_types::REVIEW_REQUESTED.to_string(), "s1".to_string()),
                (event_types::REVIEW_DECIDED.to_string(), "s1".to_string()),
            ]
        );
    }
}
