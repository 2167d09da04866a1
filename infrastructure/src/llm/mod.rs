//! LLM gateway adapters.
//!
//! - [`ScriptedLlmGateway`]: offline, replays canned replies
//! - `OpenAiGateway` (feature `http`): OpenAI-compatible chat completions

#[cfg(feature = "http")]
mod openai;
mod scripted;

#[cfg(feature = "http")]
pub use openai::OpenAiGateway;
pub use scripted::ScriptedLlmGateway;
