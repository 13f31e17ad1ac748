//! Render command handler.

use std::path::Path;
use std::time::Duration;
use storyreel::{JobStatus, StoryreelConfig, StoryreelResult, build_executor};

/// Renders the submission at `path`, printing progress until the job finishes.
pub async fn render(config: Option<&Path>, path: &Path, poll_ms: u64) -> StoryreelResult<()> {
    let config = StoryreelConfig::load_with(config)?;
    let submission = super::validate::read_submission(path).await?;
    let executor = build_executor(&config)?;

    let ticket = executor.submit(submission).await?;
    let job_id = ticket.job_id();
    println!("Job {job_id} submitted");

    let mut interval = tokio::time::interval(Duration::from_millis(poll_ms.max(100)));
    let mut last = None;
    loop {
        interval.tick().await;
        let status = executor.status(&job_id).await?;
        let line = format!(
            "[{:>3.0}%] {:<16} {}",
            status.progress * 100.0,
            status.status.to_string(),
            status.message
        );
        if last.as_ref() != Some(&line) {
            println!("{line}");
            last = Some(line);
        }
        if status.status.is_terminal() {
            break;
        }
    }

    let composition = ticket.wait().await?;
    let status = executor.status(&job_id).await?;
    if status.status == JobStatus::Completed {
        println!(
            "Video: {} ({}x{}, {}s)",
            composition.url(),
            composition.width(),
            composition.height(),
            composition.duration_secs()
        );
    }
    Ok(())
}
