//! Progress notification port
//!
//! Defines the interface for reporting progress while a protocol runs.

use mcp_domain::{McpStatus, OrchestrationResult, Step};

/// Callback for progress updates during orchestration
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once before the first step
    fn on_run_start(&self, session_id: &str, total_steps: usize);

    /// Called when a step is dispatched (`index` is 0-based)
    fn on_step_start(&self, step: &Step, index: usize, total_steps: usize);

    /// Called after a failed attempt that may still be retried
    fn on_attempt_failed(&self, _step: &Step, _attempt: u32, _error: &str) {}

    /// Called when a step has a final result
    fn on_step_complete(&self, result: &OrchestrationResult);

    /// Called once with the terminal status
    fn on_run_complete(&self, _status: McpStatus) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_run_start(&self, _session_id: &str, _total_steps: usize) {}
    fn on_step_start(&self, _step: &Step, _index: usize, _total_steps: usize) {}
    fn on_step_complete(&self, _result: &OrchestrationResult) {}
}
