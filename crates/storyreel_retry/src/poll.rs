//! Bounded fixed-interval polling of remote tasks.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use storyreel_core::{ExternalTask, TaskKind, TaskPoll};
use storyreel_error::{
    RemoteTaskError, RemoteTaskErrorKind, StoryreelError, StoryreelErrorKind, StoryreelResult,
};
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// How long to wait on a remote task.
///
/// The policy sleeps one interval before every poll, so the worst case wait is
/// `interval * max_attempts`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storyreel_retry::PollPolicy;
///
/// let policy = PollPolicy::default();
/// assert_eq!(policy.interval(), Duration::from_secs(2));
/// assert_eq!(policy.max_attempts(), 30);
/// assert_eq!(policy.ceiling(), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    interval: Duration,
    max_attempts: usize,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 30)
    }
}

impl PollPolicy {
    /// Creates a policy. `max_attempts` is raised to at least one.
    pub fn new(interval: Duration, max_attempts: usize) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Delay before each poll.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Polls before giving up.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Longest time a task can be waited on.
    pub fn ceiling(&self) -> Duration {
        self.interval * self.max_attempts as u32
    }

    /// Polls `task_id` until it succeeds, fails, or the attempts run out.
    ///
    /// `poll` performs one observation. Provider errors that are worth retrying
    /// consume an attempt; any other error ends the wait immediately.
    ///
    /// # Errors
    ///
    /// - [`RemoteTaskErrorKind::Failed`] with the provider's message when the task fails
    /// - [`RemoteTaskErrorKind::Timeout`] when every attempt saw the task unsettled
    /// - the poll error itself when it is not retryable
    #[instrument(skip(self, poll), fields(interval_ms = self.interval.as_millis() as u64, max_attempts = self.max_attempts))]
    pub async fn wait_for<F, Fut>(
        &self,
        task_id: &str,
        kind: TaskKind,
        poll: F,
    ) -> StoryreelResult<String>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = StoryreelResult<TaskPoll>>,
    {
        let task = Mutex::new(ExternalTask::new(task_id, kind));
        let task = &task;
        let poll = &poll;

        // The first poll also waits one interval; the provider never settles instantly.
        tokio::time::sleep(self.interval).await;

        let strategy = FixedInterval::from_millis(self.interval.as_millis() as u64).take(self.max_attempts - 1);

        let result = Retry::spawn(strategy, || async move {
            let observed = poll().await;
            let attempts = {
                let mut guard = task.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                if let Ok(state) = &observed {
                    guard.observe(state);
                } else {
                    guard.observe(&TaskPoll::Running);
                }
                *guard.polls()
            };

            match observed {
                Ok(TaskPoll::Succeeded(url)) => Ok(url),
                Ok(TaskPoll::Failed(message)) => {
                    warn!(task_id, %kind, %message, "Remote task failed");
                    Err(RetryError::Permanent(StoryreelError::from(
                        RemoteTaskError::new(RemoteTaskErrorKind::Failed {
                            task_id: task_id.to_string(),
                            message,
                        }),
                    )))
                }
                Ok(state) => {
                    debug!(task_id, %kind, attempts, status = %state.status(), "Remote task not settled");
                    Err(RetryError::Transient {
                        err: timeout(task_id, attempts),
                        retry_after: None,
                    })
                }
                Err(e) if is_retryable(&e) => {
                    warn!(task_id, attempts, error = %e, "Poll request failed, will retry");
                    Err(RetryError::Transient {
                        err: timeout(task_id, attempts),
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        })
        .await;

        if let Err(e) = &result {
            if let StoryreelErrorKind::RemoteTask(inner) = e.kind() {
                if inner.is_timeout() {
                    warn!(task_id, %kind, "Remote task timed out");
                }
            }
        }
        result
    }
}

fn timeout(task_id: &str, attempts: usize) -> StoryreelError {
    StoryreelError::from(RemoteTaskError::new(RemoteTaskErrorKind::Timeout {
        task_id: task_id.to_string(),
        attempts,
    }))
}

fn is_retryable(error: &StoryreelError) -> bool {
    match error.kind() {
        StoryreelErrorKind::Provider(provider) => provider.kind.is_retryable(),
        _ => false,
    }
}
