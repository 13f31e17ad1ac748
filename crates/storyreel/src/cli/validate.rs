//! Validate command handler.

use std::path::Path;
use storyreel::{
    ConfigError, FfmpegEncoder, StoryreelConfig, StoryreelResult, VideoSubmission,
};

/// Reads and validates the submission at `path`.
pub async fn read_submission(path: &Path) -> StoryreelResult<VideoSubmission> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::new(format!("Failed to read {}: {}", path.display(), e)))?;
    let submission = VideoSubmission::from_json(&json)?;
    submission.validate()?;
    Ok(submission)
}

/// Validates configuration and the submission at `path` and prints a summary.
pub async fn validate(config: Option<&Path>, path: &Path, check_encoder: bool) -> StoryreelResult<()> {
    let config = StoryreelConfig::load_with(config)?;
    config.validate()?;
    let submission = read_submission(path).await?;

    let settings = &submission.config;
    println!("Title:       {}", submission.title);
    println!("Slides:      {}", submission.slides.len());
    println!("Duration:    {}s", submission.total_duration_secs());
    println!(
        "Output:      {} @ {} fps",
        settings.resolution(),
        settings.frame_rate()
    );
    println!(
        "Narration:   {} voice at {}x, {} slide(s) with text",
        settings.voice_type(),
        settings.voice_speed(),
        submission
            .slides
            .iter()
            .filter(|s| !s.voice_text.trim().is_empty())
            .count()
    );
    if *settings.ai_image_expansion() {
        println!("Expansion:   {}", settings.expansion_style());
    } else {
        println!("Expansion:   off");
    }

    if check_encoder {
        let version = FfmpegEncoder::from_config(&config.render).version().await?;
        println!("Encoder:     {version}");
    }
    Ok(())
}
