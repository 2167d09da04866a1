//! MCP document entities.
//!
//! An [`Mcp`] is the shared decision document carried through a protocol:
//! the optimization model being built, the business context, and the
//! ordered list of steps to execute.

use super::value_objects::{
    ConstraintType, McpStatus, ObjectiveType, RetryPolicy, StepAction, VariableType,
};
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_VERSION: &str = "1.0.0";

/// The decision document.
///
/// `session_id` is fixed at construction and only exposed through a getter.
/// `status` changes only through [`Mcp::transition_to`], which enforces the
/// monotonic lifecycle.
///
/// Only `sessionId` and `protocol` are required on the wire. A document
/// without `version` or `status` loads as a fresh `1.0.0` / `pending` one,
/// and missing timestamps are filled from a single clock reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "McpWire")]
pub struct Mcp {
    session_id: String,
    pub version: String,
    status: McpStatus,
    created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
    pub model: OptimizationModel,
    pub context: McpContext,
    pub protocol: Protocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<McpMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct McpWire {
    session_id: String,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    status: McpStatus,
    #[serde(default)]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    model: OptimizationModel,
    #[serde(default)]
    context: McpContext,
    protocol: Protocol,
    #[serde(default)]
    metadata: Option<McpMetadata>,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl From<McpWire> for Mcp {
    fn from(wire: McpWire) -> Self {
        let created = wire
            .created
            .or(wire.last_modified)
            .unwrap_or_else(Utc::now);
        Self {
            session_id: wire.session_id,
            version: wire.version,
            status: wire.status,
            created,
            last_modified: wire.last_modified.unwrap_or(created),
            model: wire.model,
            context: wire.context,
            protocol: wire.protocol,
            metadata: wire.metadata,
        }
    }
}

impl Mcp {
    pub(crate) fn new(
        session_id: String,
        model: OptimizationModel,
        context: McpContext,
        protocol: Protocol,
    ) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            version: default_version(),
            status: McpStatus::Pending,
            created: now,
            last_modified: now,
            model,
            context,
            protocol,
            metadata: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn status(&self) -> McpStatus {
        self.status
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Move to `next`, refreshing `last_modified`.
    ///
    /// Fails without side effects when the move would go backward or
    /// replace one terminal status with another.
    pub fn transition_to(&mut self, next: McpStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Record a modification by an agent.
    pub fn touch(&mut self) {
        let now = Utc::now();
        // Clocks can step backward; keep last_modified >= created.
        self.last_modified = now.max(self.created);
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.protocol.steps.iter().find(|s| s.id == id)
    }

    pub fn with_metadata(mut self, metadata: McpMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Parse a document from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The optimization model an MCP describes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationModel {
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Absent until a model-building step installs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<Objective>,
}

impl OptimizationModel {
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.constraints.is_empty() && self.objective.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub variable_type: VariableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Variable {
    pub fn new(name: impl Into<String>, variable_type: VariableType) -> Self {
        Self {
            name: name.into(),
            variable_type,
            min: None,
            max: None,
            description: None,
        }
    }

    pub fn continuous(name: impl Into<String>) -> Self {
        Self::new(name, VariableType::Continuous)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, VariableType::Integer)
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, VariableType::Binary).with_bounds(0.0, 1.0)
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub expression: String,
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
}

impl Constraint {
    pub fn new(
        name: impl Into<String>,
        expression: impl Into<String>,
        constraint_type: ConstraintType,
    ) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            constraint_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    #[serde(rename = "type")]
    pub objective_type: ObjectiveType,
    pub expression: String,
}

impl Objective {
    pub fn minimize(expression: impl Into<String>) -> Self {
        Self {
            objective_type: ObjectiveType::Minimize,
            expression: expression.into(),
        }
    }

    pub fn maximize(expression: impl Into<String>) -> Self {
        Self {
            objective_type: ObjectiveType::Maximize,
            expression: expression.into(),
        }
    }
}

/// Business context the protocol runs in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct McpContext {
    pub environment: Environment,
    pub dataset: Dataset,
    pub problem_type: String,
    pub industry: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub region: String,
    pub timezone: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            region: "default".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub internal_sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<DataQuality>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_fields: Vec<String>,
}

/// Solver hints attached to a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct McpMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver: Option<String>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_gap: Option<f64>,
}

/// Ordered list of steps plus execution switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub steps: Vec<Step>,
    #[serde(default)]
    pub allow_partial_solutions: bool,
    #[serde(default = "default_true")]
    pub explainability_enabled: bool,
    #[serde(default)]
    pub human_in_the_loop: HumanInTheLoop,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            allow_partial_solutions: false,
            explainability_enabled: true,
            human_in_the_loop: HumanInTheLoop::default(),
        }
    }
}

/// Approval gates. When `required` is set, each step whose id is listed in
/// `approval_steps` waits for a reviewer before it runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HumanInTheLoop {
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub approval_steps: Vec<String>,
}

impl HumanInTheLoop {
    pub fn approving<S: Into<String>>(steps: impl IntoIterator<Item = S>) -> Self {
        Self {
            required: true,
            approval_steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the step with this id must be approved before it runs.
    pub fn gates(&self, step_id: &str) -> bool {
        self.required && self.approval_steps.iter().any(|s| s == step_id)
    }
}

fn default_true() -> bool {
    true
}

/// One protocol step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub action: StepAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicy>,
    /// Per-attempt timeout in milliseconds.
    #[serde(default, rename = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Step {
    pub fn new(id: impl Into<String>, action: impl Into<StepAction>) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            description: None,
            required: true,
            config: None,
            retry_policy: None,
            timeout_ms: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// String value from `config`, if present.
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.as_ref()?.get(key)?.as_str()
    }

    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config.as_ref()?.get(key)
    }
}

impl From<StepAction> for Step {
    fn from(action: StepAction) -> Self {
        Step::new(action.as_str().to_string(), action)
    }
}
