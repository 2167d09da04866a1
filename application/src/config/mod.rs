//! Application-level configuration.
//!
//! - [`OrchestratorParams`] controls the step loop (default retry, step timeout)
//! - [`DebateParams`] controls debate rounds, the response deadline and the verdict rule

pub mod debate_params;
pub mod orchestrator_params;

pub use debate_params::DebateParams;
pub use orchestrator_params::OrchestratorParams;
