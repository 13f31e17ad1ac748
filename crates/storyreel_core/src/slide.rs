//! Slides owned by a running job.

use crate::{SlideSpec, SynthesizedVoice};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A slide inside a job.
///
/// Created from a [`SlideSpec`] when the job starts. Enrichment only ever adds the
/// expanded image and the narration; everything else is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Slide {
    /// Stable identifier, unique within the job
    id: String,
    /// Zero-based position in the video
    index: usize,
    /// Source image URL or path
    image_url: String,
    /// Outpainted image, when expansion succeeded
    expanded_image_url: Option<String>,
    /// Caption text
    caption: String,
    /// Narration text
    voice_text: String,
    /// Narration audio, when synthesis succeeded
    voice_url: Option<String>,
    /// Estimated narration length in seconds
    voice_duration_secs: Option<f64>,
    /// Slide length in seconds
    duration_secs: u32,
    /// Transition kind
    transition: String,
}

impl Slide {
    /// Builds the job-side slide for position `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_core::{Slide, SlideSpec};
    ///
    /// let slide = Slide::from_spec(2, &SlideSpec::new("cat.png"));
    /// assert_eq!(slide.id(), "slide-2");
    /// assert_eq!(slide.best_image(), "cat.png");
    /// ```
    pub fn from_spec(index: usize, spec: &SlideSpec) -> Self {
        Self {
            id: format!("slide-{index}"),
            index,
            image_url: spec.image_url.clone(),
            expanded_image_url: None,
            caption: spec.caption.clone(),
            voice_text: spec.voice_text.clone(),
            voice_url: None,
            voice_duration_secs: None,
            duration_secs: spec.duration,
            transition: spec.transition.clone(),
        }
    }

    /// The image the compositor should use: the expansion if present, else the source.
    pub fn best_image(&self) -> &str {
        self.expanded_image_url
            .as_deref()
            .unwrap_or(self.image_url.as_str())
    }

    /// True when the slide has text to narrate.
    pub fn has_narration(&self) -> bool {
        !self.voice_text.trim().is_empty()
    }

    /// Records a successful image expansion.
    pub fn set_expanded_image(&mut self, url: impl Into<String>) {
        self.expanded_image_url = Some(url.into());
    }

    /// Records synthesized narration.
    pub fn set_voice(&mut self, voice: SynthesizedVoice) {
        self.voice_duration_secs = Some(*voice.estimated_duration_secs());
        self.voice_url = Some(voice.url().clone());
    }
}
