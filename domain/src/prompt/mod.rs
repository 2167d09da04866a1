//! Prompt templates for the agents and debate participants.

mod template;

pub use template::PromptTemplate;
