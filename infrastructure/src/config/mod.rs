//! Configuration file loading for mcp-orchestrator
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MCP_`-prefixed environment variables (`MCP_DEBATE__ROUNDS=3`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./mcp.toml` or `./.mcp.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/mcp-orchestrator/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ApprovalPolicy, ConfigIssue, ConfigIssueCode, FileApprovalConfig, FileConfig,
    FileDebateConfig, FileLlmConfig, FileLoggingConfig, FileOrchestratorConfig, FileRetryConfig,
    FileSolverConfig, FileStorageConfig, LlmProvider,
};
pub use loader::ConfigLoader;
