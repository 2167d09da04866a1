//! Bounded retry with exponential backoff and per-attempt timeout.
//!
//! The building blocks are [`Backoff`] (attempt bookkeeping) and
//! [`run_attempt`] (one attempt raced against a timeout and a cancellation
//! token). [`retry_with_timeout`] combines them for operations that own their
//! inputs; the orchestrator drives the same pieces by hand because each
//! attempt borrows the document mutably.
//!
//! A timed-out attempt counts against the same budget as a failed one. Its
//! cancellation token is cancelled and its future dropped, so cooperative
//! operations can abort in-flight work.

use mcp_domain::RetryPolicy;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Why a single attempt did not produce a value.
#[derive(Debug, Error)]
pub enum AttemptError<E> {
    #[error("{0}")]
    Failed(E),

    #[error("timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    #[error("cancelled")]
    Cancelled,
}

/// Final failure of a retried operation.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("failed after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: AttemptError<E> },

    #[error("non-retryable failure on attempt {attempt}: {error}")]
    NotRetryable { attempt: u32, error: E },

    #[error("cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } | RetryError::Cancelled { attempts } => {
                *attempts
            }
            RetryError::NotRetryable { attempt, .. } => *attempt,
        }
    }
}

/// Value produced by a retried operation, with the attempts it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Succeeded<T> {
    pub value: T,
    pub attempts: u32,
}

/// Attempt counter for one retried operation.
#[derive(Debug, Clone)]
pub struct Backoff<'a> {
    policy: &'a RetryPolicy,
    attempts: u32,
}

impl<'a> Backoff<'a> {
    pub fn new(policy: &'a RetryPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    /// Register a new attempt and return its 1-based number.
    pub fn start_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay before the next attempt, or `None` once the budget is spent.
    pub fn next_delay(&self) -> Option<Duration> {
        if self.attempts >= self.policy.effective_attempts() {
            None
        } else {
            Some(self.policy.delay_after(self.attempts))
        }
    }
}

/// Run one attempt, racing it against `timeout` and `token`.
///
/// On timeout `token` is cancelled before returning.
pub async fn run_attempt<T, E, Fut>(
    timeout: Option<Duration>,
    token: &CancellationToken,
    attempt: Fut,
) -> Result<T, AttemptError<E>>
where
    Fut: Future<Output = Result<T, E>>,
{
    let timed = async {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, attempt).await {
                Ok(result) => result.map_err(AttemptError::Failed),
                Err(_) => Err(AttemptError::TimedOut(limit)),
            },
            None => attempt.await.map_err(AttemptError::Failed),
        }
    };

    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => Err(AttemptError::Cancelled),
        result = timed => result,
    };

    if matches!(outcome, Err(AttemptError::TimedOut(_))) {
        token.cancel();
    }
    outcome
}

/// Sleep for `delay`; returns `false` if `token` was cancelled first.
pub async fn sleep_unless_cancelled(delay: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

/// Retry `op` under `policy`.
///
/// `op` receives the 1-based attempt number and a per-attempt child token of
/// `cancellation`. Errors for which `is_retryable` returns `false` end the
/// loop immediately. `on_retry` sees each failed attempt and the delay that
/// follows it, before the delay starts.
pub async fn retry_with_timeout<T, E, F, Fut, P, H>(
    policy: &RetryPolicy,
    timeout: Option<Duration>,
    cancellation: &CancellationToken,
    is_retryable: P,
    mut on_retry: H,
    mut op: F,
) -> Result<Succeeded<T>, RetryError<E>>
where
    E: Display,
    F: FnMut(u32, CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    H: FnMut(u32, &AttemptError<E>, Duration),
{
    let mut backoff = Backoff::new(policy);
    loop {
        let attempt = backoff.start_attempt();
        let token = cancellation.child_token();

        let last = match run_attempt(timeout, &token, op(attempt, token.clone())).await {
            Ok(value) => {
                return Ok(Succeeded {
                    value,
                    attempts: attempt,
                });
            }
            Err(AttemptError::Cancelled) => return Err(RetryError::Cancelled { attempts: attempt }),
            Err(AttemptError::Failed(error)) if !is_retryable(&error) => {
                return Err(RetryError::NotRetryable { attempt, error });
            }
            Err(other) => other,
        };

        let Some(delay) = backoff.next_delay() else {
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last,
            });
        };

        debug!(
            "Attempt {}/{} failed ({}), retrying in {}ms",
            attempt,
            policy.effective_attempts(),
            last,
            delay.as_millis()
        );
        on_retry(attempt, &last, delay);

        if !sleep_unless_cancelled(delay, cancellation).await {
            return Err(RetryError::Cancelled { attempts: attempt });
        }
    }
}

/// [`retry_with_timeout`] with every error retryable and no timeout.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, op: F) -> Result<Succeeded<T>, RetryError<E>>
where
    E: Display,
    F: FnMut(u32, CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_with_timeout(
        policy,
        None,
        &CancellationToken::new(),
        |_| true,
        |_, _, _| {},
        op,
    )
    .await
}
