//! Value objects for MCP documents.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

/// Lifecycle status of an MCP document.
///
/// Transitions are monotonic: `pending → in_progress → {completed | failed | cancelled}`.
/// A status may be re-asserted (no-op) but never moved backward, and a
/// terminal status never changes into another terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl McpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            McpStatus::Pending => "pending",
            McpStatus::InProgress => "in_progress",
            McpStatus::Completed => "completed",
            McpStatus::Failed => "failed",
            McpStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            McpStatus::Completed | McpStatus::Failed | McpStatus::Cancelled
        )
    }

    fn rank(&self) -> u8 {
        match self {
            McpStatus::Pending => 0,
            McpStatus::InProgress => 1,
            McpStatus::Completed | McpStatus::Failed | McpStatus::Cancelled => 2,
        }
    }

    /// Whether moving from `self` to `next` keeps the lifecycle monotonic.
    pub fn can_transition_to(&self, next: McpStatus) -> bool {
        *self == next || next.rank() > self.rank()
    }
}

impl std::fmt::Display for McpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    #[default]
    #[serde(alias = "continuous")]
    Continuous,
    #[serde(alias = "integer")]
    Integer,
    #[serde(alias = "binary")]
    Binary,
}

/// Relation a constraint expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintType {
    #[serde(alias = "equals", alias = "eq")]
    Equals,
    #[serde(alias = "less_than", alias = "lte", alias = "lt")]
    LessThan,
    #[serde(alias = "greater_than", alias = "gte", alias = "gt")]
    GreaterThan,
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectiveType {
    #[default]
    #[serde(alias = "minimize")]
    Minimize,
    #[serde(alias = "maximize")]
    Maximize,
}

/// Capability a protocol step asks for.
///
/// Unknown names parse into [`StepAction::Custom`] so a document referencing
/// an action nobody handles still loads and can be rejected by registry
/// validation with a precise message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StepAction {
    InterpretIntent,
    CollectData,
    MapData,
    BuildModel,
    SolveModel,
    ExplainSolution,
    CritiqueSolution,
    DebateSolution,
    HumanReview,
    Custom(String),
}

impl StepAction {
    pub fn as_str(&self) -> &str {
        match self {
            StepAction::InterpretIntent => "interpret_intent",
            StepAction::CollectData => "collect_data",
            StepAction::MapData => "map_data",
            StepAction::BuildModel => "build_model",
            StepAction::SolveModel => "solve_model",
            StepAction::ExplainSolution => "explain_solution",
            StepAction::CritiqueSolution => "critique_solution",
            StepAction::DebateSolution => "debate_solution",
            StepAction::HumanReview => "human_review",
            StepAction::Custom(s) => s,
        }
    }

    /// All built-in actions, in typical pipeline order.
    pub fn builtin() -> Vec<StepAction> {
        vec![
            StepAction::InterpretIntent,
            StepAction::CollectData,
            StepAction::MapData,
            StepAction::BuildModel,
            StepAction::SolveModel,
            StepAction::ExplainSolution,
            StepAction::CritiqueSolution,
            StepAction::DebateSolution,
            StepAction::HumanReview,
        ]
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, StepAction::Custom(_))
    }
}

impl std::fmt::Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StepAction {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "interpret_intent" => StepAction::InterpretIntent,
            "collect_data" => StepAction::CollectData,
            "map_data" => StepAction::MapData,
            "build_model" => StepAction::BuildModel,
            "solve_model" => StepAction::SolveModel,
            "explain_solution" => StepAction::ExplainSolution,
            "critique_solution" => StepAction::CritiqueSolution,
            "debate_solution" => StepAction::DebateSolution,
            "human_review" => StepAction::HumanReview,
            other => StepAction::Custom(other.to_string()),
        })
    }
}

impl From<&str> for StepAction {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(action) => action,
            Err(never) => match never {},
        }
    }
}

impl Serialize for StepAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StepAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(StepAction::from(s.as_str()))
    }
}

/// Exponential backoff policy for a step.
///
/// Attempt 1 runs immediately. After failed attempt `i` the caller waits
/// `initial_delay * backoff_multiplier^(i-1)`, capped at `max_delay`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_multiplier: f64,
    /// Milliseconds before the second attempt.
    pub initial_delay: u64,
    /// Upper bound for any single delay, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delay: Option<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_multiplier: 2.0,
            initial_delay: 1000,
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_multiplier: f64, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff_multiplier,
            initial_delay: initial_delay.as_millis() as u64,
            max_delay: None,
        }
    }

    /// A policy that runs the operation exactly once.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay.as_millis() as u64);
        self
    }

    /// Delay to wait after the given failed attempt (1-based) before the next one.
    pub fn delay_after(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1) as i32;
        let raw = self.initial_delay as f64 * self.backoff_multiplier.powi(exponent);
        let capped = match self.max_delay {
            Some(max) => raw.min(max as f64),
            None => raw,
        };
        Duration::from_millis(capped.max(0.0).round() as u64)
    }

    /// Never fewer than one attempt, even for a zero `max_attempts`.
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== McpStatus ====================

    #[test]
    fn test_status_forward_transitions() {
        assert!(McpStatus::Pending.can_transition_to(McpStatus::InProgress));
        assert!(McpStatus::InProgress.can_transition_to(McpStatus::Completed));
        assert!(McpStatus::InProgress.can_transition_to(McpStatus::Failed));
        assert!(McpStatus::Pending.can_transition_to(McpStatus::Cancelled));
        assert!(McpStatus::Failed.can_transition_to(McpStatus::Failed));
    }

    #[test]
    fn test_status_backward_transitions_rejected() {
        assert!(!McpStatus::InProgress.can_transition_to(McpStatus::Pending));
        assert!(!McpStatus::Completed.can_transition_to(McpStatus::InProgress));
        assert!(!McpStatus::Completed.can_transition_to(McpStatus::Failed));
        assert!(!McpStatus::Cancelled.can_transition_to(McpStatus::Completed));
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&McpStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let parsed: McpStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, McpStatus::Cancelled);
    }

    // ==================== Enumerations ====================

    #[test]
    fn test_objective_type_accepts_both_cases() {
        let upper: ObjectiveType = serde_json::from_str("\"MAXIMIZE\"").unwrap();
        let lower: ObjectiveType = serde_json::from_str("\"maximize\"").unwrap();
        assert_eq!(upper, ObjectiveType::Maximize);
        assert_eq!(lower, ObjectiveType::Maximize);
        assert_eq!(
            serde_json::to_string(&ObjectiveType::Minimize).unwrap(),
            "\"MINIMIZE\""
        );
    }

    #[test]
    fn test_constraint_type_aliases() {
        let lt: ConstraintType = serde_json::from_str("\"lte\"").unwrap();
        assert_eq!(lt, ConstraintType::LessThan);
        let gt: ConstraintType = serde_json::from_str("\"GREATER_THAN\"").unwrap();
        assert_eq!(gt, ConstraintType::GreaterThan);
    }

    // ==================== StepAction ====================

    #[test]
    fn test_step_action_roundtrip() {
        for action in StepAction::builtin() {
            let parsed: StepAction = action.as_str().parse().unwrap();
            assert_eq!(action, parsed);
        }
    }

    #[test]
    fn test_unknown_action_is_custom() {
        let action: StepAction = serde_json::from_str("\"notify_planners\"").unwrap();
        assert_eq!(action, StepAction::Custom("notify_planners".to_string()));
        assert!(action.is_custom());
        assert_eq!(
            serde_json::to_string(&action).unwrap(),
            "\"notify_planners\""
        );
    }

    // ==================== RetryPolicy ====================

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, 1000);
        assert_eq!(policy.backoff_multiplier, 2.0);
    }

    #[test]
    fn test_delay_grows_geometrically() {
        let policy = RetryPolicy::new(3, 2.0, Duration::from_millis(10));
        assert_eq!(policy.delay_after(1), Duration::from_millis(10));
        assert_eq!(policy.delay_after(2), Duration::from_millis(20));
        assert_eq!(policy.delay_after(3), Duration::from_millis(40));
    }

    #[test]
    fn test_delay_capped_by_max_delay() {
        let policy = RetryPolicy::new(10, 3.0, Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_millis(300));
        assert_eq!(policy.delay_after(3), Duration::from_millis(500));
        assert_eq!(policy.delay_after(8), Duration::from_millis(500));
    }

    #[test]
    fn test_retry_policy_wire_format() {
        let policy: RetryPolicy = serde_json::from_str(
            r#"{"maxAttempts": 5, "backoffMultiplier": 1.5, "initialDelay": 200}"#,
        )
        .unwrap();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.max_delay, None);
        assert_eq!(policy.delay_after(2), Duration::from_millis(300));
    }
}
