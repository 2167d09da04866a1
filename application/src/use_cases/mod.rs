//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod fetch_results;
pub mod orchestrate;
pub mod submit;
pub mod trigger_debate;
