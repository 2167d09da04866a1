//! Step and orchestration results.

use crate::debate::entities::DebateSession;
use crate::mcp::value_objects::StepAction;
use crate::solver::SolveResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Action-specific output of a successful step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutput {
    Intent {
        problem_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        industry: Option<String>,
        summary: String,
    },
    CollectedData {
        source: String,
        records: Vec<Value>,
    },
    DataMapping {
        /// variable name -> source field
        mappings: BTreeMap<String, String>,
        unmapped: Vec<String>,
    },
    ModelBuilt {
        variables: usize,
        constraints: usize,
        has_objective: bool,
    },
    Solution(SolveResponse),
    Explanation {
        text: String,
    },
    Critique {
        critique: String,
        score: Option<f64>,
    },
    Debate(DebateSession),
    Review {
        review_id: String,
        approved: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feedback: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
    },
    /// The step had nothing to do (e.g. explanation disabled).
    Skipped {
        reason: String,
    },
    /// Free-form output from custom agents.
    Custom {
        data: Value,
    },
}

impl StepOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            StepOutput::Intent { .. } => "intent",
            StepOutput::CollectedData { .. } => "collected_data",
            StepOutput::DataMapping { .. } => "data_mapping",
            StepOutput::ModelBuilt { .. } => "model_built",
            StepOutput::Solution(_) => "solution",
            StepOutput::Explanation { .. } => "explanation",
            StepOutput::Critique { .. } => "critique",
            StepOutput::Debate(_) => "debate",
            StepOutput::Review { .. } => "review",
            StepOutput::Skipped { .. } => "skipped",
            StepOutput::Custom { .. } => "custom",
        }
    }
}

/// What an agent returns for one attempt at a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<StepOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_process: Option<String>,
}

impl StepResult {
    pub fn success(output: StepOutput) -> Self {
        Self {
            success: true,
            error: None,
            output: Some(output),
            thought_process: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            output: None,
            thought_process: None,
        }
    }

    pub fn with_thought(mut self, thought: impl Into<String>) -> Self {
        self.thought_process = Some(thought.into());
        self
    }
}

/// One executed step in a run. Results are appended in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationResult {
    /// Step id.
    pub step: String,
    pub action: StepAction,
    /// Agent that handled the step; `None` when no agent was registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    pub result: StepResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_process: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Attempts consumed, including timed-out ones.
    pub attempts: u32,
}

impl OrchestrationResult {
    pub fn new(
        step: impl Into<String>,
        action: StepAction,
        agent: Option<String>,
        result: StepResult,
        attempts: u32,
    ) -> Self {
        Self {
            step: step.into(),
            action,
            agent,
            thought_process: result.thought_process.clone(),
            error: result.error.clone(),
            result,
            attempts,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.result.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SolveStatus;

    #[test]
    fn test_output_tagged_by_kind() {
        let output = StepOutput::Explanation {
            text: "Use 3 trucks".to_string(),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["kind"], "explanation");
        assert_eq!(json["text"], "Use 3 trucks");
        assert_eq!(output.kind(), "explanation");
    }

    #[test]
    fn test_solution_output_roundtrip() {
        let output = StepOutput::Solution(SolveResponse::failed(
            SolveStatus::Infeasible,
            "no feasible point",
        ));
        let json = serde_json::to_string(&output).unwrap();
        let parsed: StepOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, output);
    }

    #[test]
    fn test_orchestration_result_copies_error_and_thought() {
        let result = StepResult::failure("solver unreachable").with_thought("tried cbc");
        let entry = OrchestrationResult::new(
            "solve",
            StepAction::SolveModel,
            Some("solver".to_string()),
            result,
            3,
        );
        assert!(!entry.succeeded());
        assert_eq!(entry.error.as_deref(), Some("solver unreachable"));
        assert_eq!(entry.thought_process.as_deref(), Some("tried cbc"));
        assert_eq!(entry.attempts, 3);
    }
}
