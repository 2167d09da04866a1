//! Sequential protocol runner.
//!
//! Drives one [`Mcp`] through its steps in order:
//!
//! 1. `pending -> in_progress` on the first dispatch
//! 2. each step is resolved through the [`AgentRegistry`], waits for approval
//!    when `protocol.humanInTheLoop` gates it, and is retried under its
//!    [`RetryPolicy`](mcp_domain::RetryPolicy) and timeout
//! 3. a required step that exhausts its attempts aborts the run unless the
//!    protocol allows partial solutions
//! 4. the document ends `completed`, `failed` or `cancelled`
//!
//! The orchestrator does not persist anything; see
//! [`SubmitMcpUseCase`](super::submit::SubmitMcpUseCase).

use crate::agents::review::ask_reviewer;
use crate::agents::{AgentContext, AgentRegistry, AgentServices};
use crate::config::OrchestratorParams;
use crate::ports::event_logger::{EventLogger, NoEventLogger, RunEvent};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::retry::{AttemptError, Backoff, run_attempt, sleep_unless_cancelled};
use futures::FutureExt;
use mcp_domain::{
    Mcp, McpStatus, Message, OrchestrationResult, ReviewKind, ReviewRequest, Step, StepResult,
    event_types,
};
use serde_json::{Value, json};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Decides whether a failed attempt may be retried.
pub type RetryPredicate = Arc<dyn Fn(&StepResult) -> bool + Send + Sync>;

const NAME: &str = "orchestrator";

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationRun {
    pub session_id: String,
    pub status: McpStatus,
    /// One entry per executed step, in execution order.
    pub results: Vec<OrchestrationResult>,
    /// Required step that stopped the run, when partial solutions are off.
    pub aborted_at: Option<String>,
}

struct StepOutcome {
    result: OrchestrationResult,
    cancelled: bool,
}

pub struct Orchestrator {
    registry: Arc<AgentRegistry>,
    services: AgentServices,
    params: OrchestratorParams,
    logger: Arc<dyn EventLogger>,
    cancellation: CancellationToken,
    is_retryable: RetryPredicate,
}

impl Orchestrator {
    pub fn new(registry: Arc<AgentRegistry>, services: AgentServices) -> Self {
        Self {
            registry,
            services,
            params: OrchestratorParams::default(),
            logger: Arc::new(NoEventLogger),
            cancellation: CancellationToken::new(),
            is_retryable: Arc::new(|_| true),
        }
    }

    pub fn with_params(mut self, params: OrchestratorParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_event_logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Use `token` to cancel runs from outside.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_retry_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&StepResult) -> bool + Send + Sync + 'static,
    {
        self.is_retryable = Arc::new(predicate);
        self
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Run with default (no-op) progress.
    pub async fn run(&self, mcp: &mut Mcp) -> OrchestrationRun {
        self.run_with_progress(mcp, &NoProgress).await
    }

    pub async fn run_with_progress(
        &self,
        mcp: &mut Mcp,
        progress: &dyn ProgressNotifier,
    ) -> OrchestrationRun {
        let session_id = mcp.session_id().to_string();

        if mcp.status().is_terminal() {
            warn!(
                "Run {}: document is already {}, nothing to do",
                session_id,
                mcp.status()
            );
            return OrchestrationRun {
                session_id,
                status: mcp.status(),
                results: Vec::new(),
                aborted_at: None,
            };
        }

        let steps = mcp.protocol.steps.clone();
        let total = steps.len();
        info!("Run {}: {} step(s)", session_id, total);
        progress.on_run_start(&session_id, total);
        self.logger.log(RunEvent::new(
            "run_started",
            json!({ "sessionId": session_id, "steps": total }),
        ));

        let mut results: Vec<OrchestrationResult> = Vec::with_capacity(total);
        let mut aborted_at = None;
        let mut required_failed = false;
        let mut cancelled = false;

        for (index, step) in steps.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                cancelled = true;
                break;
            }
            if mcp.status() == McpStatus::Pending
                && let Err(e) = mcp.transition_to(McpStatus::InProgress)
            {
                warn!("Run {}: {}", session_id, e);
            }

            debug!(
                "Run {}: step {}/{} '{}' ({})",
                session_id,
                index + 1,
                total,
                step.id,
                step.action
            );
            progress.on_step_start(step, index, total);
            let started = json!({ "step": step.id, "action": step.action, "index": index });
            self.logger.log(RunEvent::new("step_started", started.clone()));
            self.publish(event_types::STEP_STARTED, started, &session_id);

            let outcome = self.execute_step(step, mcp, &results, progress).await;
            let result = outcome.result;

            progress.on_step_complete(&result);
            let completed = json!({
                "step": result.step,
                "agent": result.agent,
                "success": result.succeeded(),
                "attempts": result.attempts,
                "error": result.error,
            });
            self.logger.log(RunEvent::new("step_completed", completed.clone()));
            self.publish(event_types::STEP_COMPLETED, completed, &session_id);

            let failed_required = !result.succeeded() && step.required;
            if !result.succeeded() {
                warn!(
                    "Run {}: step '{}' failed after {} attempt(s): {}",
                    session_id,
                    step.id,
                    result.attempts,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);

            if outcome.cancelled {
                cancelled = true;
                break;
            }
            if failed_required {
                required_failed = true;
                if !mcp.protocol.allow_partial_solutions {
                    aborted_at = Some(step.id.clone());
                    break;
                }
            }
        }

        let status = if cancelled {
            McpStatus::Cancelled
        } else if required_failed {
            McpStatus::Failed
        } else {
            McpStatus::Completed
        };
        if let Err(e) = mcp.transition_to(status) {
            warn!("Run {}: {}", session_id, e);
        }

        info!(
            "Run {}: {} ({} of {} step(s) executed)",
            session_id,
            status,
            results.len(),
            total
        );
        progress.on_run_complete(status);
        let finished = json!({
            "status": status,
            "steps": results.len(),
            "abortedAt": aborted_at,
        });
        self.logger.log(RunEvent::new("run_completed", finished.clone()));
        self.publish(event_types::RUN_COMPLETED, finished, &session_id);

        OrchestrationRun {
            session_id,
            status,
            results,
            aborted_at,
        }
    }

    async fn execute_step(
        &self,
        step: &Step,
        mcp: &mut Mcp,
        previous: &[OrchestrationResult],
        progress: &dyn ProgressNotifier,
    ) -> StepOutcome {
        let Some(agent) = self.registry.resolve(&step.action) else {
            let result =
                StepResult::failure(format!("No agent found for action: {}", step.action));
            return StepOutcome {
                result: OrchestrationResult::new(&step.id, step.action.clone(), None, result, 0),
                cancelled: false,
            };
        };
        let agent_name = agent.name().to_string();
        let finish = |result: StepResult, attempts: u32, cancelled: bool| StepOutcome {
            result: OrchestrationResult::new(
                &step.id,
                step.action.clone(),
                Some(agent_name.clone()),
                result,
                attempts,
            ),
            cancelled,
        };

        if mcp.protocol.human_in_the_loop.gates(&step.id) {
            let request = ReviewRequest::new(
                ReviewKind::Approval,
                mcp.session_id(),
                &step.id,
                json!({ "action": step.action, "config": step.config }),
            )
            .with_description(step.description.clone());

            let decision = tokio::select! {
                decision = ask_reviewer(&self.services, &request) => decision,
                _ = self.cancellation.cancelled() => {
                    return finish(StepResult::failure("Run cancelled"), 0, true);
                }
            };
            let rejection = match decision {
                Ok(decision) if decision.approved => None,
                Ok(decision) => Some(match decision.feedback {
                    Some(feedback) => format!("Step '{}' was not approved: {}", step.id, feedback),
                    None => format!("Step '{}' was not approved", step.id),
                }),
                Err(e) => Some(format!("Approval for step '{}' failed: {}", step.id, e)),
            };
            // A rejected gate consumes no attempts and is never retried.
            if let Some(error) = rejection {
                return finish(StepResult::failure(error), 0, false);
            }
        }

        let policy = self.params.retry_for(step);
        let timeout = self.params.timeout_for(step);
        let mut backoff = Backoff::new(policy);

        loop {
            let attempt = backoff.start_attempt();
            let token = self.cancellation.child_token();
            let ctx = AgentContext::new(&self.services, previous, token.clone());

            let run = async {
                match AssertUnwindSafe(agent.run(step, &mut *mcp, &ctx))
                    .catch_unwind()
                    .await
                {
                    Ok(result) if result.success => Ok(result),
                    Ok(result) => Err(result),
                    Err(_) => Err(StepResult::failure(format!(
                        "Agent '{}' panicked",
                        agent.name()
                    ))),
                }
            };

            let failure = match run_attempt(timeout, &token, run).await {
                Ok(result) => return finish(result, attempt, false),
                Err(AttemptError::Failed(result)) => result,
                Err(AttemptError::TimedOut(limit)) => StepResult::failure(format!(
                    "Step '{}' timed out after {}ms",
                    step.id,
                    limit.as_millis()
                )),
                Err(AttemptError::Cancelled) => {
                    return finish(StepResult::failure("Run cancelled"), attempt, true);
                }
            };

            let delay = if (self.is_retryable)(&failure) {
                backoff.next_delay()
            } else {
                None
            };
            let Some(delay) = delay else {
                return finish(failure, attempt, false);
            };

            let error = failure.error.as_deref().unwrap_or("unknown error");
            debug!(
                "Step '{}': attempt {} failed ({}), retrying in {}ms",
                step.id,
                attempt,
                error,
                delay.as_millis()
            );
            progress.on_attempt_failed(step, attempt, error);
            self.logger.log(RunEvent::new(
                "attempt_failed",
                json!({
                    "step": step.id,
                    "attempt": attempt,
                    "error": error,
                    "delayMs": delay.as_millis() as u64,
                }),
            ));

            if !sleep_unless_cancelled(delay, &self.cancellation).await {
                return finish(failure, attempt, true);
            }
        }
    }

    fn publish(&self, event_type: &str, payload: Value, session_id: &str) {
        self.services
            .bus
            .publish(Message::new(event_type, payload, session_id).from_agent(NAME));
    }
}
