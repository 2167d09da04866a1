//! Structured run event logging.
//!
//! Provides [`JsonlEventLogger`], a JSONL file writer that implements
//! the [`EventLogger`](mcp_application::EventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlEventLogger;
