//! Domain layer for mcp-orchestrator
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## MCP
//!
//! The MCP is the shared decision document: an optimization model under
//! construction, the business context, and a protocol (an ordered list of
//! steps). Each step names an action that some agent knows how to perform.
//!
//! ## Human review
//!
//! A `human_review` step, or an approval gate declared in
//! `protocol.humanInTheLoop`, pauses the run on a [`ReviewRequest`] until a
//! reviewer answers with a [`ReviewDecision`].
//!
//! ## Debate
//!
//! A multi-round exchange between agents, used to challenge a result before
//! it is accepted. Rounds are recorded in a [`DebateSession`] and judged by a
//! pluggable [`ScoringStrategy`].

pub mod core;
pub mod debate;
pub mod mcp;
pub mod message;
pub mod prompt;
pub mod review;
pub mod solver;
pub mod step;

// Re-export commonly used types
pub use core::error::DomainError;
pub use debate::{
    entities::{DebateRound, DebateSession},
    scoring::{
        HighestMeanScore, JudgeMention, ScoringStrategy, Undecided, Verdict, parse_score,
        strategy_by_name,
    },
};
pub use mcp::{
    builder::McpBuilder,
    entities::{
        Constraint, DEFAULT_VERSION, DataQuality, Dataset, Environment, HumanInTheLoop, Mcp,
        McpContext, McpMetadata, Objective, OptimizationModel, Protocol, Step, Variable,
    },
    model_parser::{extract_json, parse_model},
    validation::{McpValidator, Severity, ValidationIssue, ValidationIssueCode},
    value_objects::{
        ConstraintType, McpStatus, ObjectiveType, RetryPolicy, StepAction, VariableType,
    },
};
pub use message::{Message, TriggerDebate, event_types};
pub use prompt::PromptTemplate;
pub use review::{ReviewDecision, ReviewKind, ReviewRequest};
pub use solver::{SolveRequest, SolveResponse, SolveStatus};
pub use step::result::{OrchestrationResult, StepOutput, StepResult};
