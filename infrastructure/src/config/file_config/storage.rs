//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory for run records (one JSON file per session).
    /// Falls back to the platform data directory.
    pub results_dir: Option<PathBuf>,
    /// Directory of `<source>.json` files served to `collect_data` steps
    pub data_dir: Option<PathBuf>,
}
