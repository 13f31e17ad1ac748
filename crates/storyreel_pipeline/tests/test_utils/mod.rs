//! Test doubles for pipeline tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyreel_compositor::{Compositor, EncodeRecipe, MediaEncoder, RecipeInput};
use storyreel_core::{
    ExpansionStyle, JobId, ProgressUpdate, SlideSpec, SynthesizedVoice, VideoConfig,
    VideoSubmission, VoiceType,
};
use storyreel_error::{
    CompositionError, CompositionErrorKind, RemoteTaskError, RemoteTaskErrorKind,
    StoryreelResult,
};
use storyreel_interface::{MediaGenerator, ProgressSink};
use storyreel_storage::LocalStorage;
use tempfile::TempDir;

/// Media generator writing fake outputs to a directory.
pub struct FakeGenerator {
    dir: PathBuf,
    /// Slide images whose expansion fails
    pub failing_images: HashSet<String>,
    /// Narration texts whose synthesis fails
    pub failing_texts: HashSet<String>,
    /// Delay before every expansion answers
    pub expand_delay: Option<Duration>,
    pub expand_calls: Mutex<Vec<(String, ExpansionStyle)>>,
    pub voice_calls: Mutex<Vec<(String, VoiceType, f64)>>,
}

impl FakeGenerator {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            failing_images: HashSet::new(),
            failing_texts: HashSet::new(),
            expand_delay: None,
            expand_calls: Mutex::new(Vec::new()),
            voice_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn expand_count(&self) -> usize {
        self.expand_calls.lock().unwrap().len()
    }
}

fn task_failed(message: &str) -> RemoteTaskError {
    RemoteTaskError::new(RemoteTaskErrorKind::Failed {
        task_id: "task-1".to_string(),
        message: message.to_string(),
    })
}

#[async_trait]
impl MediaGenerator for FakeGenerator {
    async fn expand_image(&self, image: &str, style: ExpansionStyle) -> StoryreelResult<String> {
        let call = {
            let mut calls = self.expand_calls.lock().unwrap();
            calls.push((image.to_string(), style));
            calls.len()
        };
        if let Some(delay) = self.expand_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_images.contains(image) {
            return Err(task_failed("InvalidParameter").into());
        }
        let path = self.dir.join(format!("expanded_{call}.png"));
        std::fs::write(&path, format!("expanded:{image}")).expect("write expanded image");
        Ok(path.to_string_lossy().to_string())
    }

    async fn synthesize_voice(
        &self,
        text: &str,
        voice: VoiceType,
        speed: f64,
    ) -> StoryreelResult<SynthesizedVoice> {
        let call = {
            let mut calls = self.voice_calls.lock().unwrap();
            calls.push((text.to_string(), voice, speed));
            calls.len()
        };
        if self.failing_texts.contains(text) {
            return Err(task_failed("Throttling").into());
        }
        let path = self.dir.join(format!("voice_{call}.mp3"));
        std::fs::write(&path, b"mp3").expect("write voice");
        Ok(SynthesizedVoice::new(
            path.to_string_lossy().to_string(),
            text.chars().count() as f64 / 5.0,
        ))
    }
}

/// Encoder that records what each clip was built from.
#[derive(Default)]
pub struct RecordingEncoder {
    /// Every stage encoded, in order
    pub stages: Mutex<Vec<String>>,
    /// Image bytes seen by each slide clip, by stage
    pub images: Mutex<Vec<(String, String)>>,
    /// Stages whose clip had narration
    pub narrated: Mutex<Vec<String>>,
    /// Fail every encode
    pub always_fail: bool,
}

impl RecordingEncoder {
    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    pub fn encode_count(&self) -> usize {
        self.stages.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaEncoder for RecordingEncoder {
    async fn encode(&self, stage: &str, recipe: &EncodeRecipe) -> StoryreelResult<()> {
        self.stages.lock().unwrap().push(stage.to_string());
        for input in recipe.inputs() {
            match input {
                RecipeInput::Image { path, .. } => {
                    let bytes = std::fs::read_to_string(path).unwrap_or_default();
                    self.images
                        .lock()
                        .unwrap()
                        .push((stage.to_string(), bytes));
                }
                RecipeInput::Audio { .. } => {
                    self.narrated.lock().unwrap().push(stage.to_string());
                }
                _ => {}
            }
        }
        if self.always_fail {
            return Err(CompositionError::new(CompositionErrorKind::EncoderFailed {
                stage: stage.to_string(),
                diagnostic: "Conversion failed!".to_string(),
            })
            .into());
        }
        std::fs::write(recipe.output(), b"mp4").expect("write output");
        Ok(())
    }
}

/// Sink keeping every update it receives.
#[derive(Default)]
pub struct RecordingSink {
    pub updates: Mutex<Vec<ProgressUpdate>>,
}

impl RecordingSink {
    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn publish(&self, _job_id: JobId, update: ProgressUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}

/// Scratch directories shared by a test.
pub struct Workspace {
    pub sources: TempDir,
    pub generated: TempDir,
    pub work: TempDir,
    pub uploads: TempDir,
}

impl Workspace {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            sources: TempDir::new()?,
            generated: TempDir::new()?,
            work: TempDir::new()?,
            uploads: TempDir::new()?,
        })
    }

    pub fn compositor(&self, encoder: Arc<RecordingEncoder>) -> anyhow::Result<Arc<Compositor>> {
        let storage = Arc::new(LocalStorage::new(self.uploads.path(), "http://files.test")?);
        Ok(Arc::new(Compositor::new(encoder, storage, self.work.path())))
    }

    /// Source image whose contents name it, returned as a path string.
    pub fn image(&self, name: &str) -> String {
        let path = self.sources.path().join(name);
        std::fs::write(&path, format!("original:{name}")).expect("write source image");
        path.to_string_lossy().to_string()
    }

    /// Submission with one slide per `(image, voice_text)` pair.
    pub fn submission(&self, slides: &[(&str, &str)], config: VideoConfig) -> VideoSubmission {
        VideoSubmission {
            title: "Summer trip".to_string(),
            description: String::new(),
            slides: slides
                .iter()
                .map(|(image, voice)| {
                    let mut spec = SlideSpec::new(self.image(image));
                    spec.caption = format!("Caption for {image}");
                    spec.voice_text = voice.to_string();
                    spec
                })
                .collect(),
            config,
        }
    }
}
