//! Progress reporting for protocol runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mcp_application::ProgressNotifier;
use mcp_domain::{McpStatus, OrchestrationResult, Step};
use std::sync::Mutex;

/// Reports progress with a single step bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_run_start(&self, session_id: &str, total_steps: usize) {
        let bar = ProgressBar::new(total_steps as u64);
        bar.set_style(Self::style());
        bar.set_prefix(session_id.to_string());
        bar.set_message("Starting...");
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_step_start(&self, step: &Step, _index: usize, _total_steps: usize) {
        self.with_bar(|bar| bar.set_message(format!("{} ({})", step.id, step.action)));
    }

    fn on_attempt_failed(&self, step: &Step, attempt: u32, error: &str) {
        self.with_bar(|bar| {
            bar.println(format!(
                "  {} {} attempt {} failed: {}",
                "!".yellow(),
                step.id,
                attempt,
                error
            ))
        });
    }

    fn on_step_complete(&self, result: &OrchestrationResult) {
        self.with_bar(|bar| {
            let status = if result.succeeded() {
                format!("{} {}", "v".green(), result.step)
            } else {
                format!("{} {}", "x".red(), result.step)
            };
            bar.set_message(status);
            bar.inc(1);
        });
    }

    fn on_run_complete(&self, status: McpStatus) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            let message = match status {
                McpStatus::Completed => status.as_str().green(),
                _ => status.as_str().red(),
            };
            bar.finish_with_message(message.to_string());
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_run_start(&self, session_id: &str, total_steps: usize) {
        println!(
            "{} {} ({} steps)",
            "->".cyan(),
            session_id.bold(),
            total_steps
        );
    }

    fn on_step_start(&self, step: &Step, index: usize, total_steps: usize) {
        println!("  [{}/{}] {} ({})", index + 1, total_steps, step.id, step.action);
    }

    fn on_attempt_failed(&self, step: &Step, attempt: u32, error: &str) {
        println!("    {} attempt {} of {} failed: {}", "!".yellow(), attempt, step.id, error);
    }

    fn on_step_complete(&self, result: &OrchestrationResult) {
        if result.succeeded() {
            println!("    {} {}", "v".green(), result.step);
        } else {
            println!("    {} {} (failed)", "x".red(), result.step);
        }
    }

    fn on_run_complete(&self, status: McpStatus) {
        println!("{} {}\n", "->".cyan(), status);
    }
}
