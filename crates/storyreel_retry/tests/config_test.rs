//! Tests for layered configuration loading.

use std::time::Duration;
use storyreel_retry::StoryreelConfig;
use tempfile::TempDir;

#[test]
fn test_bundled_defaults() -> anyhow::Result<()> {
    let config = StoryreelConfig::bundled()?;

    assert_eq!(config.provider.name, "dashscope");
    assert_eq!(config.provider.base_url, "https://dashscope.aliyuncs.com/api/v1");
    assert_eq!(config.provider.sync_tts_max_chars, 300);
    assert_eq!(config.polling.interval_ms, 2000);
    assert_eq!(config.polling.max_attempts, 30);
    assert_eq!(config.job_retry.max_retries, 3);
    assert_eq!(config.job_retry.backoff_secs, 60);
    assert_eq!(config.job_retry.time_limit_secs, 3600);

    let poll = config.poll_policy();
    assert_eq!(poll.ceiling(), Duration::from_secs(60));
    let retry = config.job_retry_policy();
    assert_eq!(retry.max_attempts(), 4);
    Ok(())
}

#[test]
fn test_explicit_file_overrides_defaults() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("override.toml");
    std::fs::write(
        &path,
        r#"
[polling]
interval_ms = 500
max_attempts = 10

[workers]
slots = 8
"#,
    )?;

    let config = StoryreelConfig::load_with(Some(&path))?;
    assert_eq!(config.polling.interval_ms, 500);
    assert_eq!(config.polling.max_attempts, 10);
    assert_eq!(config.workers.slots, 8);
    // Untouched sections keep bundled values
    assert_eq!(config.job_retry.max_retries, 3);
    assert_eq!(config.render.ffmpeg_path, "ffmpeg");
    Ok(())
}

#[test]
fn test_invalid_values_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[workers]\nslots = 0\n")?;

    let err = StoryreelConfig::load_with(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("workers.slots"));
    Ok(())
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = StoryreelConfig::load_with(Some(std::path::Path::new(
        "/definitely/not/here/storyreel.toml",
    )));
    assert!(result.is_err());
}

#[test]
fn test_validate_names_the_offending_setting() -> anyhow::Result<()> {
    let mut config = StoryreelConfig::bundled()?;
    config.polling.interval_ms = 0;
    let err = config.validate().unwrap_err();
    assert_eq!(err.setting.as_deref(), Some("polling.interval_ms"));
    assert!(err.to_string().starts_with("Configuration Error: polling.interval_ms must be positive"));

    let mut config = StoryreelConfig::bundled()?;
    config.provider.base_url = "  ".to_string();
    assert_eq!(
        config.validate().unwrap_err().setting.as_deref(),
        Some("provider.base_url")
    );
    Ok(())
}
