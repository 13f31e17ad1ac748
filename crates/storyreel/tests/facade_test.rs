//! Tests for the facade wiring and the bundled demo submission.

use std::path::PathBuf;
use storyreel::{Resolution, StoryreelConfig, VideoSubmission, build_executor, voice_catalog};
use tempfile::TempDir;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn test_demo_submission_is_valid() -> anyhow::Result<()> {
    let json = std::fs::read_to_string(demo("trip.json"))?;
    let submission = VideoSubmission::from_json(&json)?;
    submission.validate()?;

    assert_eq!(submission.slides.len(), 3);
    assert_eq!(submission.total_duration_secs(), 15);
    assert_eq!(*submission.config.resolution(), Resolution::P1080);
    assert_eq!(submission.slides[2].transition, "fade");
    Ok(())
}

#[test]
fn test_missing_api_key_is_reported() -> anyhow::Result<()> {
    let uploads = TempDir::new()?;
    let mut config = StoryreelConfig::bundled()?;
    config.provider.api_key_env = "STORYREEL_TEST_UNSET_API_KEY".to_string();
    config.storage.upload_dir = uploads.path().to_path_buf();

    let err = match build_executor(&config) {
        Ok(_) => panic!("executor built without an API key"),
        Err(e) => e,
    };
    assert!(format!("{err}").contains("STORYREEL_TEST_UNSET_API_KEY"));
    Ok(())
}

#[tokio::test]
async fn test_executor_builds_with_key() -> anyhow::Result<()> {
    let uploads = TempDir::new()?;
    let mut config = StoryreelConfig::bundled()?;
    config.provider.api_key_env = "PATH".to_string();
    config.storage.upload_dir = uploads.path().to_path_buf();

    let executor = build_executor(&config)?;
    assert!(executor.store().is_empty().await);
    Ok(())
}

#[test]
fn test_voice_catalog_is_reexported() {
    assert_eq!(voice_catalog().len(), 6);
}
