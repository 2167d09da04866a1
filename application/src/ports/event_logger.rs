//! Port for structured run logging.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures run events (step
//! attempts, results, bus traffic) in a machine-readable form such as JSONL.

use serde_json::Value;

/// A structured run event.
pub struct RunEvent {
    /// Event type identifier (e.g. "step_attempt_failed", "bus_message").
    pub event_type: &'static str,
    pub payload: Value,
}

impl RunEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Records run events.
///
/// `log` is synchronous and infallible so logging never disturbs a run;
/// implementations swallow their own I/O errors.
pub trait EventLogger: Send + Sync {
    fn log(&self, event: RunEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoEventLogger;

impl EventLogger for NoEventLogger {
    fn log(&self, _event: RunEvent) {}
}
