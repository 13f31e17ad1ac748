//! Tests for whole-job retry.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use storyreel_error::{
    CompositionError, CompositionErrorKind, PipelineErrorKind, StoryreelError,
    StoryreelErrorKind, ValidationError, ValidationErrorKind,
};
use storyreel_retry::JobRetryPolicy;

fn encoder_failure() -> StoryreelError {
    StoryreelError::from(CompositionError::new(CompositionErrorKind::EncoderFailed {
        stage: "slide 0".to_string(),
        diagnostic: "boom".to_string(),
    }))
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_after_four_attempts() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = JobRetryPolicy::default();
    let start = tokio::time::Instant::now();

    let seen = attempts.clone();
    let err = policy
        .run("job-1", |number| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                assert!(number >= 1);
                Err::<(), _>(encoder_failure())
            }
        })
        .await
        .unwrap_err();

    assert_eq!(attempts.load(Ordering::SeqCst), 4);
    assert!(matches!(err.kind(), StoryreelErrorKind::Composition(_)));
    assert_eq!(start.elapsed(), Duration::from_secs(180));
}

#[tokio::test(start_paused = true)]
async fn test_recovers_on_second_attempt() {
    let policy = JobRetryPolicy::default();
    let value = policy
        .run("job-2", |number| async move {
            if number == 1 {
                Err(encoder_failure())
            } else {
                Ok(number)
            }
        })
        .await
        .unwrap();
    assert_eq!(value, 2);
}

#[tokio::test(start_paused = true)]
async fn test_validation_errors_are_not_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = JobRetryPolicy::default();

    let seen = attempts.clone();
    let err = policy
        .run("job-3", |_| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(StoryreelError::from(ValidationError::new(
                    ValidationErrorKind::SlideCount(0),
                )))
            }
        })
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_time_limit_is_fatal() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = JobRetryPolicy::new(3, Duration::from_secs(60), Duration::from_secs(10));

    let seen = attempts.clone();
    let err = policy
        .run("job-4", |_| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<(), StoryreelError>(())
            }
        })
        .await
        .unwrap_err();

    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    match err.kind() {
        StoryreelErrorKind::Pipeline(inner) => assert_eq!(
            inner.kind,
            PipelineErrorKind::TimedOut {
                job_id: "job-4".to_string(),
                limit_secs: 10,
            }
        ),
        other => panic!("expected timeout, got {other}"),
    }
}
