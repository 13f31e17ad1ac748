//! Test doubles for composition tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use storyreel_compositor::{EncodeRecipe, MediaEncoder, RecipeInput};
use storyreel_core::{Slide, SlideSpec, SynthesizedVoice};
use storyreel_error::{CompositionError, CompositionErrorKind, StoryreelResult};
use storyreel_interface::CompositionProgress;

/// Encoder that records recipes and writes a placeholder output file.
#[derive(Default)]
pub struct RecordingEncoder {
    pub recipes: Mutex<Vec<(String, EncodeRecipe)>>,
    /// Stage that fails instead of encoding
    pub fail_stage: Option<String>,
    /// Every input file that was missing when its recipe ran
    pub missing_inputs: Mutex<Vec<PathBuf>>,
    /// Caption text files as they read when their clip was encoded
    pub captions: Mutex<Vec<String>>,
}

impl RecordingEncoder {
    pub fn failing_at(stage: &str) -> Self {
        Self {
            fail_stage: Some(stage.to_string()),
            ..Self::default()
        }
    }

    pub fn clip_recipes(&self) -> Vec<EncodeRecipe> {
        self.recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|(stage, _)| stage.starts_with("slide"))
            .map(|(_, recipe)| recipe.clone())
            .collect()
    }
}

#[async_trait]
impl MediaEncoder for RecordingEncoder {
    async fn encode(&self, stage: &str, recipe: &EncodeRecipe) -> StoryreelResult<()> {
        self.recipes
            .lock()
            .unwrap()
            .push((stage.to_string(), recipe.clone()));

        for input in recipe.inputs() {
            let path = match input {
                RecipeInput::Image { path, .. }
                | RecipeInput::Audio { path }
                | RecipeInput::ConcatList { path } => path,
                RecipeInput::Silence { .. } => continue,
            };
            if !path.is_file() {
                self.missing_inputs.lock().unwrap().push(path.clone());
            }
        }

        for filter in recipe.video_filters() {
            if let Some(rest) = filter.strip_prefix("drawtext=textfile='") {
                let path = rest.split('\'').next().unwrap_or_default();
                let text = std::fs::read_to_string(path).expect("read caption file");
                self.captions.lock().unwrap().push(text);
            }
        }

        if self.fail_stage.as_deref() == Some(stage) {
            return Err(CompositionError::new(CompositionErrorKind::EncoderFailed {
                stage: stage.to_string(),
                diagnostic: "Error while decoding stream #0:0".to_string(),
            })
            .into());
        }

        std::fs::write(recipe.output(), b"fake mp4").expect("write output");
        Ok(())
    }
}

/// Progress receiver keeping every fraction reported.
#[derive(Default)]
pub struct RecordingProgress {
    pub fractions: Mutex<Vec<f64>>,
}

#[async_trait]
impl CompositionProgress for RecordingProgress {
    async fn report(&self, fraction: f64, _message: &str) {
        self.fractions.lock().unwrap().push(fraction);
    }
}

/// Writes a placeholder image into `dir` and returns a slide using it.
pub fn slide(dir: &Path, index: usize, caption: &str, duration: u32) -> Slide {
    let image = dir.join(format!("source_{index}.png"));
    std::fs::write(&image, b"png").expect("write image");

    let mut spec = SlideSpec::new(image.to_string_lossy().to_string());
    spec.caption = caption.to_string();
    spec.duration = duration;
    Slide::from_spec(index, &spec)
}

/// Adds narration stored at `path` to `slide`.
pub fn narrate(slide: &mut Slide, path: &Path) {
    std::fs::write(path, b"mp3").expect("write audio");
    slide.set_voice(SynthesizedVoice::new(path.to_string_lossy().to_string(), 2.0));
}

/// Files left in `dir`.
pub fn remaining_files(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}
