//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the daily tracing log and the JSONL event log
    pub dir: Option<PathBuf>,
    /// Write `<session>.events.jsonl` next to the tracing log
    pub event_log: bool,
}
