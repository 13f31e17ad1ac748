//! Whole-job retry with a fixed backoff and a per-attempt time ceiling.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use storyreel_error::{
    PipelineError, PipelineErrorKind, StoryreelError, StoryreelErrorKind, StoryreelResult,
};
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::{error, info, instrument, warn};

/// Re-runs a failed job from scratch.
///
/// Attempts are not resumable: every attempt starts over, and side effects of earlier
/// attempts (uploads, provider charges) are not rolled back.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storyreel_retry::JobRetryPolicy;
///
/// let policy = JobRetryPolicy::default();
/// assert_eq!(policy.max_attempts(), 4);
/// assert_eq!(policy.backoff(), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobRetryPolicy {
    max_retries: usize,
    backoff: Duration,
    time_limit: Duration,
}

impl Default for JobRetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(60), Duration::from_secs(3600))
    }
}

impl JobRetryPolicy {
    /// Creates a policy.
    pub fn new(max_retries: usize, backoff: Duration, time_limit: Duration) -> Self {
        Self {
            max_retries,
            backoff,
            time_limit,
        }
    }

    /// Re-runs after the first attempt.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// First attempt plus retries.
    pub fn max_attempts(&self) -> usize {
        self.max_retries + 1
    }

    /// Delay between attempts.
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Ceiling for a single attempt.
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Whether a failure of attempt number `attempt` (1-based) leads to another attempt.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_error::{ConfigError, StoryreelError};
    /// use storyreel_retry::JobRetryPolicy;
    ///
    /// let policy = JobRetryPolicy::default();
    /// let err = StoryreelError::from(ConfigError::new("bad"));
    /// assert!(!policy.will_retry(1, &err));
    /// ```
    pub fn will_retry(&self, attempt: usize, error: &StoryreelError) -> bool {
        attempt < self.max_attempts() && !is_permanent(error)
    }

    /// Runs `attempt` until it succeeds or the policy gives up.
    ///
    /// `attempt` receives the 1-based attempt number. Validation errors and attempts
    /// that exceed the time ceiling are not retried.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt, or [`PipelineErrorKind::TimedOut`].
    #[instrument(skip(self, attempt), fields(max_attempts = self.max_attempts()))]
    pub async fn run<F, Fut, T>(&self, job_id: &str, mut attempt: F) -> StoryreelResult<T>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = StoryreelResult<T>>,
    {
        let counter = AtomicUsize::new(0);
        let counter = &counter;
        let limit = self.time_limit;
        let max_attempts = self.max_attempts();
        let strategy =
            FixedInterval::from_millis(self.backoff.as_millis() as u64).take(self.max_retries);

        Retry::spawn(strategy, || {
            let number = counter.fetch_add(1, Ordering::SeqCst) + 1;
            let run = attempt(number);
            async move {
                info!(job_id, attempt = number, "Starting job attempt");
                match tokio::time::timeout(limit, run).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) if is_permanent(&e) => {
                        error!(job_id, attempt = number, error = %e, "Job failed permanently");
                        Err(RetryError::Permanent(e))
                    }
                    Ok(Err(e)) => {
                        if number < max_attempts {
                            warn!(job_id, attempt = number, error = %e, "Job attempt failed, will retry");
                        } else {
                            error!(job_id, attempt = number, error = %e, "Job attempts exhausted");
                        }
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                    Err(_) => {
                        error!(job_id, attempt = number, limit_secs = limit.as_secs(), "Job attempt timed out");
                        Err(RetryError::Permanent(StoryreelError::from(
                            PipelineError::new(PipelineErrorKind::TimedOut {
                                job_id: job_id.to_string(),
                                limit_secs: limit.as_secs(),
                            }),
                        )))
                    }
                }
            }
        })
        .await
    }
}

fn is_permanent(error: &StoryreelError) -> bool {
    matches!(
        error.kind(),
        StoryreelErrorKind::Validation(_) | StoryreelErrorKind::Config(_)
    )
}
