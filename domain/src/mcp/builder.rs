//! Fluent construction of MCP documents.
//!
//! ```
//! use mcp_domain::{McpBuilder, Objective, StepAction, Variable};
//!
//! let mcp = McpBuilder::new("fleet-2024-06")
//!     .problem_type("vehicle_routing")
//!     .add_variable(Variable::integer("trucks").with_bounds(0.0, 40.0))
//!     .objective(Objective::minimize("total_distance"))
//!     .add_data_collection_step("collect_fleet", "fleet_db")
//!     .add_step("solve", StepAction::SolveModel)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(mcp.protocol.steps.len(), 2);
//! ```

use super::entities::{
    Constraint, Dataset, Environment, HumanInTheLoop, Mcp, McpContext, McpMetadata, Objective,
    OptimizationModel, Protocol, Step, Variable,
};
use super::value_objects::StepAction;
use crate::core::error::DomainError;
use serde_json::json;
use std::collections::HashSet;

/// Builder for [`Mcp`].
///
/// Problems (duplicate ids, an empty session id) are reported by
/// [`McpBuilder::build`], so chains never need intermediate `?`.
#[derive(Debug, Clone)]
pub struct McpBuilder {
    session_id: String,
    model: OptimizationModel,
    context: McpContext,
    protocol: Protocol,
    metadata: Option<McpMetadata>,
}

impl McpBuilder {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            model: OptimizationModel::default(),
            context: McpContext::default(),
            protocol: Protocol::default(),
            metadata: None,
        }
    }

    /// Builder with a freshly generated session id.
    pub fn generated() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    // ==================== Model ====================

    pub fn add_variable(mut self, variable: Variable) -> Self {
        self.model.variables.push(variable);
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.model.constraints.push(constraint);
        self
    }

    pub fn objective(mut self, objective: Objective) -> Self {
        self.model.objective = Some(objective);
        self
    }

    // ==================== Context ====================

    pub fn context(mut self, context: McpContext) -> Self {
        self.context = context;
        self
    }

    pub fn environment(mut self, region: impl Into<String>, timezone: impl Into<String>) -> Self {
        self.context.environment = Environment {
            region: region.into(),
            timezone: timezone.into(),
        };
        self
    }

    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.context.dataset = dataset;
        self
    }

    pub fn problem_type(mut self, problem_type: impl Into<String>) -> Self {
        self.context.problem_type = problem_type.into();
        self
    }

    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.context.industry = industry.into();
        self
    }

    pub fn metadata(mut self, metadata: McpMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    // ==================== Protocol ====================

    pub fn add_step(self, id: impl Into<String>, action: impl Into<StepAction>) -> Self {
        self.push_step(Step::new(id, action))
    }

    /// Add a fully configured step.
    pub fn push_step(mut self, step: Step) -> Self {
        self.protocol.steps.push(step);
        self
    }

    pub fn add_intent_step(self, id: impl Into<String>, request: impl Into<String>) -> Self {
        let request = request.into();
        self.push_step(
            Step::new(id, StepAction::InterpretIntent)
                .with_description("Interpret the business request")
                .with_config(json!({ "request": request })),
        )
    }

    pub fn add_data_collection_step(
        self,
        id: impl Into<String>,
        data_source: impl Into<String>,
    ) -> Self {
        let data_source = data_source.into();
        self.push_step(
            Step::new(id, StepAction::CollectData)
                .with_description(format!("Collect data from {}", data_source))
                .with_config(json!({ "dataSource": data_source })),
        )
    }

    pub fn add_mapping_step(self, id: impl Into<String>) -> Self {
        self.push_step(
            Step::new(id, StepAction::MapData)
                .with_description("Map collected fields to variables"),
        )
    }

    /// `action` must be `build_model` or `solve_model`; anything else is
    /// added as given and left to registry validation.
    pub fn add_model_step(self, id: impl Into<String>, action: StepAction) -> Self {
        let description = format!("Execute {}", action);
        self.push_step(Step::new(id, action).with_description(description))
    }

    pub fn add_explanation_step(self, id: impl Into<String>, format: &str) -> Self {
        self.push_step(
            Step::new(id, StepAction::ExplainSolution)
                .with_description("Explain solution")
                .with_config(json!({ "format": format })),
        )
    }

    pub fn add_critique_step(self, id: impl Into<String>) -> Self {
        self.push_step(
            Step::new(id, StepAction::CritiqueSolution)
                .with_description("Critique the solution")
                .optional(),
        )
    }

    pub fn add_debate_step(self, id: impl Into<String>, topic: impl Into<String>) -> Self {
        let topic: String = topic.into();
        self.push_step(
            Step::new(id, StepAction::DebateSolution)
                .with_description("Debate the solution")
                .with_config(json!({ "topic": topic }))
                .optional(),
        )
    }

    pub fn add_review_step(self, id: impl Into<String>) -> Self {
        self.push_step(
            Step::new(id, StepAction::HumanReview).with_description("Review the results so far"),
        )
    }

    /// Require approval before each of the named steps runs.
    pub fn require_approval<S: Into<String>>(mut self, steps: impl IntoIterator<Item = S>) -> Self {
        self.protocol.human_in_the_loop = HumanInTheLoop::approving(steps);
        self
    }

    pub fn allow_partial_solutions(mut self, allow: bool) -> Self {
        self.protocol.allow_partial_solutions = allow;
        self
    }

    pub fn explainability(mut self, enabled: bool) -> Self {
        self.protocol.explainability_enabled = enabled;
        self
    }

    pub fn human_in_the_loop(mut self, hitl: HumanInTheLoop) -> Self {
        self.protocol.human_in_the_loop = hitl;
        self
    }

    // ==================== Build ====================

    /// Produce a `pending` document with `created == last_modified`.
    ///
    /// An empty protocol gets a single default `collect_data` step.
    pub fn build(mut self) -> Result<Mcp, DomainError> {
        if self.session_id.trim().is_empty() {
            return Err(DomainError::EmptySessionId);
        }

        let mut seen = HashSet::new();
        for step in &self.protocol.steps {
            if !seen.insert(step.id.as_str()) {
                return Err(DomainError::DuplicateStepId(step.id.clone()));
            }
        }

        let mut seen = HashSet::new();
        for variable in &self.model.variables {
            if !seen.insert(variable.name.as_str()) {
                return Err(DomainError::DuplicateVariable(variable.name.clone()));
            }
        }

        if self.protocol.steps.is_empty() {
            self.protocol
                .steps
                .push(Step::from(StepAction::CollectData).with_description("Collect data"));
        }

        let mut mcp = Mcp::new(self.session_id, self.model, self.context, self.protocol);
        if let Some(metadata) = self.metadata {
            mcp = mcp.with_metadata(metadata);
        }
        Ok(mcp)
    }
}
