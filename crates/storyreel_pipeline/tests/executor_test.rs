//! Tests for job submission, worker slots and whole-job retries.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use storyreel_core::{JobStatus, VideoConfig};
use storyreel_error::{PipelineErrorKind, StoryreelErrorKind};
use storyreel_pipeline::{InMemoryJobStore, JobExecutor};
use storyreel_retry::JobRetryPolicy;
use test_utils::{FakeGenerator, RecordingEncoder, RecordingSink, Workspace};

fn executor(
    workspace: &Workspace,
    generator: Arc<FakeGenerator>,
    encoder: Arc<RecordingEncoder>,
    recorder: Arc<RecordingSink>,
    retry: JobRetryPolicy,
) -> anyhow::Result<JobExecutor> {
    Ok(JobExecutor::new(
        generator,
        workspace.compositor(encoder)?,
        Arc::new(InMemoryJobStore::with_forward(recorder)),
        retry,
        2,
    ))
}

#[tokio::test(start_paused = true)]
async fn test_successful_job_completes() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;
    let recorder = Arc::new(RecordingSink::default());
    let executor = executor(
        &workspace,
        Arc::new(FakeGenerator::new(workspace.generated.path())),
        Arc::new(RecordingEncoder::default()),
        recorder,
        JobRetryPolicy::default(),
    )?;

    let ticket = executor
        .submit(workspace.submission(&[("a.png", "hi"), ("b.png", "")], VideoConfig::default()))
        .await?;
    let job_id = ticket.job_id();
    let composition = ticket.wait().await?;

    let status = executor.status(&job_id).await?;
    assert_eq!(status.status, JobStatus::Completed);
    assert_eq!(status.progress, 1.0);
    assert_eq!(status.output_url.as_deref(), Some(composition.url().as_str()));
    assert_eq!(*composition.duration_secs(), 10);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_failing_job_is_attempted_four_times() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;
    let recorder = Arc::new(RecordingSink::default());
    let encoder = Arc::new(RecordingEncoder::failing());
    let executor = executor(
        &workspace,
        Arc::new(FakeGenerator::new(workspace.generated.path())),
        encoder.clone(),
        recorder.clone(),
        JobRetryPolicy::default(),
    )?;

    let started = tokio::time::Instant::now();
    let ticket = executor
        .submit(workspace.submission(&[("a.png", "")], VideoConfig::default()))
        .await?;
    let job_id = ticket.job_id();
    let err = ticket.wait().await.unwrap_err();

    assert!(format!("{err}").contains("Conversion failed!"));
    assert_eq!(encoder.encode_count(), 4);
    assert!(started.elapsed() >= Duration::from_secs(180));

    let status = executor.status(&job_id).await?;
    assert_eq!(status.status, JobStatus::Failed);
    assert!(status.error.as_deref().unwrap_or_default().contains("Conversion failed!"));

    let updates = recorder.updates();
    let failed = updates.iter().filter(|u| u.status == JobStatus::Failed).count();
    assert_eq!(failed, 1);
    let notices = updates
        .iter()
        .filter(|u| u.status == JobStatus::Pending && u.message.contains("retrying"))
        .count();
    assert_eq!(notices, 3);
    for pair in updates.windows(2) {
        assert!(pair[1].progress >= pair[0].progress);
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_time_limit_is_not_retried() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;
    let mut generator = FakeGenerator::new(workspace.generated.path());
    generator.expand_delay = Some(Duration::from_secs(120));
    let generator = Arc::new(generator);
    let executor = executor(
        &workspace,
        generator.clone(),
        Arc::new(RecordingEncoder::default()),
        Arc::new(RecordingSink::default()),
        JobRetryPolicy::new(3, Duration::from_secs(60), Duration::from_secs(30)),
    )?;

    let ticket = executor
        .submit(workspace.submission(&[("a.png", "")], VideoConfig::default()))
        .await?;
    let job_id = ticket.job_id();
    let err = ticket.wait().await.unwrap_err();

    match err.kind() {
        StoryreelErrorKind::Pipeline(inner) => {
            assert!(matches!(inner.kind, PipelineErrorKind::TimedOut { limit_secs: 30, .. }))
        }
        other => panic!("expected time limit, got {other}"),
    }
    assert_eq!(generator.expand_count(), 1);
    assert_eq!(executor.status(&job_id).await?.status, JobStatus::Failed);
    Ok(())
}

#[tokio::test]
async fn test_invalid_submission_is_never_dispatched() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;
    let generator = Arc::new(FakeGenerator::new(workspace.generated.path()));
    let encoder = Arc::new(RecordingEncoder::default());
    let executor = executor(
        &workspace,
        generator.clone(),
        encoder.clone(),
        Arc::new(RecordingSink::default()),
        JobRetryPolicy::default(),
    )?;

    let mut submission = workspace.submission(&[("a.png", "")], VideoConfig::default());
    submission.slides[0].duration = 31;

    let err = executor.submit(submission).await.unwrap_err();
    assert!(err.is_validation());
    assert!(executor.store().is_empty().await);
    assert_eq!(generator.expand_count(), 0);
    assert_eq!(encoder.encode_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unknown_job_status() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;
    let executor = executor(
        &workspace,
        Arc::new(FakeGenerator::new(workspace.generated.path())),
        Arc::new(RecordingEncoder::default()),
        Arc::new(RecordingSink::default()),
        JobRetryPolicy::default(),
    )?;

    let err = executor
        .status(&storyreel_core::JobId::new())
        .await
        .unwrap_err();
    assert!(format!("{err}").contains("Job not found"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_jobs_share_slots() -> anyhow::Result<()> {
    let workspace = Workspace::new()?;
    let executor = executor(
        &workspace,
        Arc::new(FakeGenerator::new(workspace.generated.path())),
        Arc::new(RecordingEncoder::default()),
        Arc::new(RecordingSink::default()),
        JobRetryPolicy::default(),
    )?;

    let mut tickets = Vec::new();
    for _ in 0..3 {
        tickets.push(
            executor
                .submit(workspace.submission(&[("a.png", "x")], VideoConfig::default()))
                .await?,
        );
    }
    for ticket in tickets {
        let job_id = ticket.job_id();
        ticket.wait().await?;
        assert_eq!(executor.status(&job_id).await?.status, JobStatus::Completed);
    }
    assert_eq!(executor.store().len().await, 3);
    Ok(())
}
