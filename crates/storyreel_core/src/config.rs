//! Render configuration shared by every slide of a job.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Output resolution.
///
/// Parsing is strict: an unknown resolution is a submission error.
///
/// # Examples
///
/// ```
/// use storyreel_core::Resolution;
///
/// assert_eq!(Resolution::P1080.dimensions(), (1920, 1080));
/// let parsed: Resolution = serde_json::from_str("\"4k\"").unwrap();
/// assert_eq!(parsed.dimensions(), (3840, 2160));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    derive_more::Display,
)]
pub enum Resolution {
    /// 854x480
    #[serde(rename = "480p")]
    #[strum(serialize = "480p")]
    #[display("480p")]
    P480,
    /// 1280x720
    #[default]
    #[serde(rename = "720p")]
    #[strum(serialize = "720p")]
    #[display("720p")]
    P720,
    /// 1920x1080
    #[serde(rename = "1080p")]
    #[strum(serialize = "1080p")]
    #[display("1080p")]
    P1080,
    /// 2560x1440
    #[serde(rename = "2k")]
    #[strum(serialize = "2k")]
    #[display("2k")]
    K2,
    /// 3840x2160
    #[serde(rename = "4k")]
    #[strum(serialize = "4k")]
    #[display("4k")]
    K4,
}

impl Resolution {
    /// Pixel dimensions as `(width, height)`.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Resolution::P480 => (854, 480),
            Resolution::P720 => (1280, 720),
            Resolution::P1080 => (1920, 1080),
            Resolution::K2 => (2560, 1440),
            Resolution::K4 => (3840, 2160),
        }
    }
}

/// Narration voice.
///
/// Unknown names deserialize to [`VoiceType::StandardFemale`] so a stale client never
/// fails a job over a voice it no longer offers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    derive_more::Display,
)]
#[serde(rename_all = "camelCase", from = "String")]
#[strum(serialize_all = "camelCase")]
pub enum VoiceType {
    /// Standard female narrator
    #[default]
    #[display("standardFemale")]
    StandardFemale,
    /// Standard male narrator
    #[display("standardMale")]
    StandardMale,
    /// Soft female narrator
    #[display("gentleFemale")]
    GentleFemale,
    /// Deep male narrator
    #[display("deepMale")]
    DeepMale,
    /// Child voice
    #[display("child")]
    Child,
    /// Cartoon voice
    #[display("cartoon")]
    Cartoon,
}

impl From<String> for VoiceType {
    fn from(value: String) -> Self {
        VoiceType::from_str(&value).unwrap_or_default()
    }
}

/// Visual style requested from image expansion.
///
/// Lenient like [`VoiceType`]: unknown styles become [`ExpansionStyle::Cinematic`].
///
/// # Examples
///
/// ```
/// use storyreel_core::ExpansionStyle;
///
/// let style: ExpansionStyle = serde_json::from_str("\"watercolor\"").unwrap();
/// assert_eq!(style, ExpansionStyle::Cinematic);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase", from = "String")]
#[strum(serialize_all = "lowercase")]
pub enum ExpansionStyle {
    /// Film-like lighting and composition
    #[default]
    #[display("cinematic")]
    Cinematic,
    /// Japanese animation look
    #[display("anime")]
    Anime,
    /// Photorealistic
    #[display("realistic")]
    Realistic,
    /// Soft, hazy fantasy
    #[display("dreamy")]
    Dreamy,
    /// Retro film tones
    #[display("vintage")]
    Vintage,
    /// Painterly
    #[display("artistic")]
    Artistic,
}

impl From<String> for ExpansionStyle {
    fn from(value: String) -> Self {
        ExpansionStyle::from_str(&value).unwrap_or_default()
    }
}

/// Background music selection.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackgroundMusic {
    /// No music
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    #[display("none")]
    Silent,
    /// Gentle
    #[default]
    #[display("gentle")]
    Gentle,
    /// Upbeat
    #[display("upbeat")]
    Upbeat,
    /// Epic
    #[display("epic")]
    Epic,
    /// Romantic
    #[display("romantic")]
    Romantic,
    /// Nostalgic
    #[display("nostalgic")]
    Nostalgic,
}

impl BackgroundMusic {
    /// Whether a music track was requested at all.
    pub fn is_enabled(self) -> bool {
        self != BackgroundMusic::Silent
    }
}

/// Vertical band where captions are drawn.
///
/// Lenient: unknown positions draw at the bottom.
///
/// # Examples
///
/// ```
/// use storyreel_core::SubtitlePosition;
///
/// let position: SubtitlePosition = serde_json::from_str("\"middle\"").unwrap();
/// assert_eq!(position, SubtitlePosition::Bottom);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase", from = "String")]
#[strum(serialize_all = "lowercase")]
pub enum SubtitlePosition {
    /// 15% of frame height
    #[display("top")]
    Top,
    /// 50% of frame height
    #[display("center")]
    Center,
    /// 85% of frame height
    #[default]
    #[display("bottom")]
    Bottom,
}

impl From<String> for SubtitlePosition {
    fn from(value: String) -> Self {
        SubtitlePosition::from_str(&value).unwrap_or_default()
    }
}

impl SubtitlePosition {
    /// Band center as a fraction of frame height.
    pub fn vertical_fraction(self) -> f64 {
        match self {
            SubtitlePosition::Top => 0.15,
            SubtitlePosition::Center => 0.5,
            SubtitlePosition::Bottom => 0.85,
        }
    }
}

/// Job-wide render settings. Immutable once the job starts.
///
/// Every field has a default, so `{}` is a valid configuration.
///
/// # Examples
///
/// ```
/// use storyreel_core::{Resolution, VideoConfig};
///
/// let config = VideoConfig::builder()
///     .resolution(Resolution::P1080)
///     .ai_image_expansion(false)
///     .build()
///     .unwrap();
/// assert_eq!(*config.frame_rate(), 30);
/// assert!(!config.ai_image_expansion());
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_builder::Builder,
)]
#[serde(default)]
#[builder(default, setter(into))]
pub struct VideoConfig {
    /// Output resolution
    resolution: Resolution,
    /// Frames per second
    frame_rate: u32,
    /// Narration voice
    voice_type: VoiceType,
    /// Narration speed multiplier (0.5-2.0)
    voice_speed: f64,
    /// Background music selection
    background_music: BackgroundMusic,
    /// Draw captions on slides
    subtitle_enabled: bool,
    /// Caption band
    subtitle_position: SubtitlePosition,
    /// Outpaint slide images before composing
    ai_image_expansion: bool,
    /// Style used for outpainting
    expansion_style: ExpansionStyle,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            frame_rate: 30,
            voice_type: VoiceType::default(),
            voice_speed: 1.0,
            background_music: BackgroundMusic::default(),
            subtitle_enabled: true,
            subtitle_position: SubtitlePosition::default(),
            ai_image_expansion: true,
            expansion_style: ExpansionStyle::default(),
        }
    }
}

impl VideoConfig {
    /// Creates a new config builder seeded with defaults.
    pub fn builder() -> VideoConfigBuilder {
        VideoConfigBuilder::default()
    }
}
