//! Infrastructure layer for mcp-orchestrator
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod approval;
pub mod config;
pub mod data;
pub mod llm;
pub mod logging;
pub mod solver;
pub mod storage;

// Re-export commonly used types
pub use approval::PolicyApprover;
pub use config::{ApprovalPolicy, ConfigIssue, ConfigLoader, FileConfig, LlmProvider};
pub use data::InMemoryDataService;
#[cfg(feature = "http")]
pub use llm::OpenAiGateway;
pub use llm::ScriptedLlmGateway;
pub use logging::JsonlEventLogger;
#[cfg(feature = "http")]
pub use solver::HttpSolverClient;
pub use solver::UnconfiguredSolver;
pub use storage::{InMemoryResultRepository, JsonFileResultRepository};
