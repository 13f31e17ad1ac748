//! Tests for the remote media client.

mod test_utils;

use std::sync::Arc;
use storyreel_core::{ExpansionStyle, TaskPoll, VoiceType};
use storyreel_error::{RemoteTaskErrorKind, StoryreelErrorKind};
use storyreel_interface::MediaGenerator;
use storyreel_models::{RemoteMediaClient, style_prompt};
use storyreel_retry::PollPolicy;
use storyreel_storage::LocalStorage;
use tempfile::TempDir;
use test_utils::MockProvider;

fn client(provider: Arc<MockProvider>, dir: &TempDir) -> anyhow::Result<RemoteMediaClient> {
    let storage = Arc::new(LocalStorage::new(dir.path(), "http://files.test")?);
    Ok(RemoteMediaClient::new(provider, storage, PollPolicy::default()))
}

#[tokio::test(start_paused = true)]
async fn test_expand_image_returns_polled_url() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let provider = Arc::new(MockProvider::new(vec![
        TaskPoll::Queued,
        TaskPoll::Running,
        TaskPoll::Succeeded("https://oss.test/wide.png".to_string()),
    ]));
    let client = client(provider.clone(), &dir)?;

    let url = client
        .expand_image("https://cdn.test/cat.jpg", ExpansionStyle::Vintage)
        .await?;
    assert_eq!(url, "https://oss.test/wide.png");

    let calls = provider.calls.lock().unwrap();
    assert_eq!(calls.polls, 3);
    assert_eq!(calls.expansions[0].0, "https://cdn.test/cat.jpg");
    assert!(calls.expansions[0].1.contains(style_prompt(ExpansionStyle::Vintage)));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_expand_image_failure_carries_message() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let provider = Arc::new(MockProvider::new(vec![TaskPoll::Failed(
        "DataInspectionFailed".to_string(),
    )]));
    let client = client(provider, &dir)?;

    let err = client
        .expand_image("a.jpg", ExpansionStyle::Cinematic)
        .await
        .unwrap_err();
    match err.kind() {
        StoryreelErrorKind::RemoteTask(inner) => match &inner.kind {
            RemoteTaskErrorKind::Failed { message, .. } => {
                assert_eq!(message, "DataInspectionFailed")
            }
            other => panic!("expected failure, got {other}"),
        },
        other => panic!("expected remote task error, got {other}"),
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_expand_image_times_out() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let provider = Arc::new(MockProvider::new(vec![TaskPoll::Running]));
    let client = client(provider.clone(), &dir)?;

    let err = client
        .expand_image("a.jpg", ExpansionStyle::Cinematic)
        .await
        .unwrap_err();
    assert!(err.is_remote_task());
    assert_eq!(provider.calls.lock().unwrap().polls, 30);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_short_text_uses_inline_speech() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let provider = Arc::new(MockProvider::new(vec![]));
    let client = client(provider.clone(), &dir)?;

    let text = "从前有一座山";
    let voice = client
        .synthesize_voice(text, VoiceType::GentleFemale, 1.5)
        .await?;

    assert!(voice.url().starts_with("http://files.test/uploads/tts_"));
    assert!(voice.url().ends_with(".mp3"));
    assert_eq!(*voice.estimated_duration_secs(), 6.0 / 5.0);

    let name = voice.url().rsplit('/').next().unwrap_or_default().to_string();
    assert_eq!(std::fs::read(dir.path().join(name))?, b"inline-mp3");

    let calls = provider.calls.lock().unwrap();
    assert_eq!(calls.polls, 0);
    let request = &calls.syntheses[0];
    assert!(*request.prefer_sync());
    assert_eq!(request.voice_id(), "zhishu");
    assert_eq!(*request.speech_rate(), 1.5);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_long_text_polls_and_downloads() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let provider = Arc::new(MockProvider::new(vec![
        TaskPoll::Running,
        TaskPoll::Succeeded("https://oss.test/speech.mp3".to_string()),
    ]));
    let client = client(provider.clone(), &dir)?;

    let text = "字".repeat(301);
    let voice = client
        .synthesize_voice(&text, VoiceType::StandardMale, 1.0)
        .await?;

    assert_eq!(*voice.estimated_duration_secs(), 301.0 / 5.0);
    let name = voice.url().rsplit('/').next().unwrap_or_default().to_string();
    assert_eq!(std::fs::read(dir.path().join(name))?, b"remote-mp3");

    let calls = provider.calls.lock().unwrap();
    assert!(!*calls.syntheses[0].prefer_sync());
    assert_eq!(calls.polls, 2);
    assert_eq!(calls.fetches, vec!["https://oss.test/speech.mp3".to_string()]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_exactly_three_hundred_chars_is_inline() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let provider = Arc::new(MockProvider::new(vec![]));
    let client = client(provider.clone(), &dir)?;

    client
        .synthesize_voice(&"a".repeat(300), VoiceType::Child, 1.0)
        .await?;
    assert!(*provider.calls.lock().unwrap().syntheses[0].prefer_sync());
    Ok(())
}

#[tokio::test]
async fn test_empty_text_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let provider = Arc::new(MockProvider::new(vec![]));
    let client = client(provider.clone(), &dir)?;

    assert!(client.synthesize_voice("   ", VoiceType::Child, 1.0).await.is_err());
    assert!(provider.calls.lock().unwrap().syntheses.is_empty());
    Ok(())
}
