//! Tests for submission parsing and validation.

use storyreel_core::{
    BackgroundMusic, ExpansionStyle, Resolution, SlideSpec, SubtitlePosition, VideoConfig,
    VideoSubmission, VoiceType,
};
use storyreel_error::ValidationErrorKind;

fn submission(slides: Vec<SlideSpec>) -> VideoSubmission {
    VideoSubmission {
        title: "Autumn".to_string(),
        description: String::new(),
        slides,
        config: VideoConfig::default(),
    }
}

#[test]
fn test_minimal_json_uses_defaults() -> anyhow::Result<()> {
    let json = r#"{
        "title": "Autumn",
        "slides": [{"image_url": "https://cdn.example.com/leaf.jpg"}]
    }"#;
    let parsed: VideoSubmission = serde_json::from_str(json)?;

    let config = &parsed.config;
    assert_eq!(*config.resolution(), Resolution::P720);
    assert_eq!(*config.frame_rate(), 30);
    assert_eq!(*config.voice_type(), VoiceType::StandardFemale);
    assert_eq!(*config.voice_speed(), 1.0);
    assert_eq!(*config.background_music(), BackgroundMusic::Gentle);
    assert!(*config.subtitle_enabled());
    assert_eq!(*config.subtitle_position(), SubtitlePosition::Bottom);
    assert!(*config.ai_image_expansion());
    assert_eq!(*config.expansion_style(), ExpansionStyle::Cinematic);
    assert_eq!(parsed.slides[0].duration, 5);
    assert!(parsed.validate().is_ok());
    Ok(())
}

#[test]
fn test_unknown_voice_and_style_fall_back() -> anyhow::Result<()> {
    let json = r#"{"voice_type": "robot", "expansion_style": "cubist"}"#;
    let config: VideoConfig = serde_json::from_str(json)?;
    assert_eq!(*config.voice_type(), VoiceType::StandardFemale);
    assert_eq!(*config.expansion_style(), ExpansionStyle::Cinematic);

    let json = r#"{"voice_type": "deepMale", "expansion_style": "anime"}"#;
    let config: VideoConfig = serde_json::from_str(json)?;
    assert_eq!(*config.voice_type(), VoiceType::DeepMale);
    assert_eq!(*config.expansion_style(), ExpansionStyle::Anime);
    Ok(())
}

#[test]
fn test_unknown_resolution_is_rejected() {
    let json = r#"{"resolution": "8k"}"#;
    assert!(serde_json::from_str::<VideoConfig>(json).is_err());
}

#[test]
fn test_from_json_reports_unknown_strict_values() {
    let err = VideoSubmission::from_json(
        r#"{"title": "t", "slides": [{"image_url": "a.jpg"}], "config": {"background_music": "jazz"}}"#,
    )
    .unwrap_err();
    assert!(err.is_validation());
    assert!(format!("{err}").contains("Unknown background_music 'jazz'"));

    let err = VideoSubmission::from_json(r#"{"title": "t"}"#).unwrap_err();
    assert!(!err.is_validation());
    assert!(format!("{err}").contains("JSON Error in submission"));
    assert!(format!("{err}").contains("slides"));
}

#[test]
fn test_from_json_accepts_known_values() -> anyhow::Result<()> {
    let parsed = VideoSubmission::from_json(
        r#"{"title": "t", "slides": [{"image_url": "a.jpg", "duration": 8}],
            "config": {"resolution": "4k", "background_music": "none", "voice_type": "whisper"}}"#,
    )?;
    assert_eq!(*parsed.config.resolution(), Resolution::K4);
    assert!(!parsed.config.background_music().is_enabled());
    assert_eq!(*parsed.config.voice_type(), VoiceType::StandardFemale);
    assert_eq!(parsed.total_duration_secs(), 8);
    Ok(())
}

#[test]
fn test_unknown_subtitle_position_draws_at_bottom() -> anyhow::Result<()> {
    let parsed = VideoSubmission::from_json(
        r#"{"title": "t", "slides": [{"image_url": "a.jpg"}],
            "config": {"subtitle_position": "middle"}}"#,
    )?;
    assert_eq!(*parsed.config.subtitle_position(), SubtitlePosition::Bottom);
    assert_eq!(parsed.config.subtitle_position().vertical_fraction(), 0.85);
    assert!(parsed.validate().is_ok());

    let config: VideoConfig = serde_json::from_str(r#"{"subtitle_position": "top"}"#)?;
    assert_eq!(*config.subtitle_position(), SubtitlePosition::Top);
    assert_eq!(serde_json::to_string(&SubtitlePosition::Center)?, "\"center\"");
    Ok(())
}

#[test]
fn test_background_music_none_is_disabled() -> anyhow::Result<()> {
    let config: VideoConfig = serde_json::from_str(r#"{"background_music": "none"}"#)?;
    assert!(!config.background_music().is_enabled());
    assert!(BackgroundMusic::Epic.is_enabled());
    Ok(())
}

#[test]
fn test_resolution_dimensions() {
    assert_eq!(Resolution::P480.dimensions(), (854, 480));
    assert_eq!(Resolution::P720.dimensions(), (1280, 720));
    assert_eq!(Resolution::P1080.dimensions(), (1920, 1080));
    assert_eq!(Resolution::K2.dimensions(), (2560, 1440));
    assert_eq!(Resolution::K4.dimensions(), (3840, 2160));
}

#[test]
fn test_title_bounds() {
    let mut sub = submission(vec![SlideSpec::new("a.jpg")]);
    sub.title = String::new();
    let err = sub.validate().unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::Title(0));

    sub.title = "字".repeat(100);
    assert!(sub.validate().is_ok());

    sub.title = "x".repeat(101);
    assert!(sub.validate().is_err());
}

#[test]
fn test_slide_count_bounds() {
    let sub = submission(Vec::new());
    assert_eq!(sub.validate().unwrap_err().kind, ValidationErrorKind::SlideCount(0));

    let sub = submission((0..20).map(|i| SlideSpec::new(format!("{i}.jpg"))).collect());
    assert!(sub.validate().is_ok());

    let sub = submission((0..21).map(|i| SlideSpec::new(format!("{i}.jpg"))).collect());
    assert_eq!(sub.validate().unwrap_err().kind, ValidationErrorKind::SlideCount(21));
}

#[test]
fn test_slide_duration_bounds() {
    let mut slide = SlideSpec::new("a.jpg");
    slide.duration = 31;
    let sub = submission(vec![SlideSpec::new("ok.jpg"), slide]);
    assert_eq!(
        sub.validate().unwrap_err().kind,
        ValidationErrorKind::SlideDuration { index: 1, seconds: 31 }
    );

    let mut slide = SlideSpec::new("a.jpg");
    slide.duration = 2;
    assert!(submission(vec![slide]).validate().is_ok());
}

#[test]
fn test_missing_image_rejected() {
    let sub = submission(vec![SlideSpec::new("  ")]);
    assert_eq!(sub.validate().unwrap_err().kind, ValidationErrorKind::MissingImage(0));
}

#[test]
fn test_voice_speed_and_frame_rate_bounds() -> anyhow::Result<()> {
    let mut sub = submission(vec![SlideSpec::new("a.jpg")]);

    sub.config = VideoConfig::builder().voice_speed(2.5).build()?;
    assert!(matches!(
        sub.validate().unwrap_err().kind,
        ValidationErrorKind::VoiceSpeed(_)
    ));

    sub.config = VideoConfig::builder().voice_speed(0.5).build()?;
    assert!(sub.validate().is_ok());

    sub.config = VideoConfig::builder().frame_rate(0u32).build()?;
    assert_eq!(sub.validate().unwrap_err().kind, ValidationErrorKind::FrameRate(0));
    Ok(())
}

#[test]
fn test_total_duration() {
    let mut a = SlideSpec::new("a.jpg");
    a.duration = 7;
    let b = SlideSpec::new("b.jpg");
    assert_eq!(submission(vec![a, b]).total_duration_secs(), 12);
}
