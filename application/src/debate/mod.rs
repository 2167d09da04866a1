//! Debate subprotocol.
//!
//! A [`DebateRequester`] publishes `trigger_debate` and waits for the reply
//! correlated with its session id. A [`DebateCoordinator`] listening on the
//! same bus runs the rounds in a spawned task and answers with
//! `debate_result`, or `debate_failed` when a participant errors.

pub mod coordinator;
pub mod participant;
pub mod requester;

pub use coordinator::DebateCoordinator;
pub use participant::{DebateParticipant, DebateRole, LlmDebateParticipant};
pub use requester::DebateRequester;

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DebateError {
    #[error("Invalid debate request: {0}")]
    Validation(String),

    #[error("No debate result within {}ms", .0.as_millis())]
    TimedOut(Duration),

    #[error("Debate failed: {0}")]
    Failed(String),
}

impl DebateError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DebateError::TimedOut(_))
    }
}
