//! Job submission payload and its validation.

use crate::{BackgroundMusic, Resolution, VideoConfig};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use storyreel_error::{JsonError, StoryreelResult, ValidationError, ValidationErrorKind};

/// Longest accepted title, in characters.
pub const MAX_TITLE_CHARS: usize = 100;
/// Most slides a single video may carry.
pub const MAX_SLIDES: usize = 20;
/// Accepted slide durations, in seconds.
pub const SLIDE_DURATION_SECS: std::ops::RangeInclusive<u32> = 2..=30;
/// Accepted narration speeds.
pub const VOICE_SPEED: std::ops::RangeInclusive<f64> = 0.5..=2.0;
/// Accepted frame rates.
pub const FRAME_RATE: std::ops::RangeInclusive<u32> = 1..=60;

/// One slide as submitted.
///
/// # Examples
///
/// ```
/// use storyreel_core::SlideSpec;
///
/// let slide: SlideSpec = serde_json::from_str(r#"{"image_url": "https://cdn/a.jpg"}"#).unwrap();
/// assert_eq!(slide.duration, 5);
/// assert_eq!(slide.transition, "fade");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSpec {
    /// Source image URL or local path
    pub image_url: String,
    /// Caption drawn over the slide
    #[serde(default)]
    pub caption: String,
    /// Narration text
    #[serde(default)]
    pub voice_text: String,
    /// Slide length in seconds
    #[serde(default = "default_duration")]
    pub duration: u32,
    /// Transition kind
    #[serde(default = "default_transition")]
    pub transition: String,
}

fn default_duration() -> u32 {
    5
}

fn default_transition() -> String {
    "fade".to_string()
}

impl SlideSpec {
    /// A slide with default caption, narration, duration and transition.
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            caption: String::new(),
            voice_text: String::new(),
            duration: default_duration(),
            transition: default_transition(),
        }
    }
}

/// A request to render one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSubmission {
    /// Video title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Slides in playback order
    pub slides: Vec<SlideSpec>,
    /// Render settings
    #[serde(default)]
    pub config: VideoConfig,
}

impl VideoSubmission {
    /// Parses a JSON submission.
    ///
    /// Resolution and background music must name a known value; voice type and
    /// expansion style fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown resolution or background music, and a
    /// JSON error for malformed input.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_core::VideoSubmission;
    ///
    /// let err = VideoSubmission::from_json(
    ///     r#"{"title": "t", "slides": [{"image_url": "a.jpg"}], "config": {"resolution": "8k"}}"#,
    /// )
    /// .unwrap_err();
    /// assert!(err.is_validation());
    /// ```
    pub fn from_json(json: &str) -> StoryreelResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| JsonError::new("submission", e.to_string()))?;

        if let Some(config) = value.get("config") {
            check_strict::<Resolution>(config, "resolution")?;
            check_strict::<BackgroundMusic>(config, "background_music")?;
        }

        Ok(serde_json::from_value(value)
            .map_err(|e| JsonError::new("submission", e.to_string()))?)
    }

    /// Checks every bound a submission must satisfy before it is dispatched.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_core::{SlideSpec, VideoConfig, VideoSubmission};
    ///
    /// let mut submission = VideoSubmission {
    ///     title: "Holiday".to_string(),
    ///     description: String::new(),
    ///     slides: vec![SlideSpec::new("beach.jpg")],
    ///     config: VideoConfig::default(),
    /// };
    /// assert!(submission.validate().is_ok());
    ///
    /// submission.slides[0].duration = 1;
    /// assert!(submission.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        let title_chars = self.title.chars().count();
        if title_chars == 0 || title_chars > MAX_TITLE_CHARS {
            return Err(ValidationError::new(ValidationErrorKind::Title(title_chars)));
        }

        if self.slides.is_empty() || self.slides.len() > MAX_SLIDES {
            return Err(ValidationError::new(ValidationErrorKind::SlideCount(
                self.slides.len(),
            )));
        }

        for (index, slide) in self.slides.iter().enumerate() {
            if slide.image_url.trim().is_empty() {
                return Err(ValidationError::new(ValidationErrorKind::MissingImage(index)));
            }
            if !SLIDE_DURATION_SECS.contains(&slide.duration) {
                return Err(ValidationError::new(ValidationErrorKind::SlideDuration {
                    index,
                    seconds: slide.duration,
                }));
            }
        }

        let speed = *self.config.voice_speed();
        if !VOICE_SPEED.contains(&speed) {
            return Err(ValidationError::new(ValidationErrorKind::VoiceSpeed(
                speed.to_string(),
            )));
        }

        let frame_rate = *self.config.frame_rate();
        if !FRAME_RATE.contains(&frame_rate) {
            return Err(ValidationError::new(ValidationErrorKind::FrameRate(frame_rate)));
        }

        Ok(())
    }

    /// Total playback length before background music, in seconds.
    pub fn total_duration_secs(&self) -> u32 {
        self.slides.iter().map(|slide| slide.duration).sum()
    }
}

fn check_strict<T: FromStr>(config: &serde_json::Value, field: &str) -> Result<(), ValidationError> {
    match config.get(field) {
        Some(serde_json::Value::String(value)) if T::from_str(value).is_err() => {
            Err(ValidationError::new(ValidationErrorKind::UnknownValue {
                field: field.to_string(),
                value: value.clone(),
            }))
        }
        _ => Ok(()),
    }
}
