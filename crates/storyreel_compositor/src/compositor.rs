//! Slide-to-video composition.

use crate::{CaptionOverlay, EncodeRecipe, MediaEncoder, ScratchFiles, concat_list};
use derive_getters::Getters;
use std::path::PathBuf;
use std::sync::Arc;
use storyreel_core::{JobId, Slide, VideoConfig};
use storyreel_error::{CompositionError, CompositionErrorKind, StoryreelResult};
use storyreel_interface::CompositionProgress;
use storyreel_storage::ObjectStorage;

/// Shortest clip that still fits a fade in and a fade out with one second between.
pub const MIN_CLIP_SECS: u32 = 2;

/// A finished video.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Composition {
    /// Storage URL of the video
    url: String,
    /// Frame width in pixels
    width: u32,
    /// Frame height in pixels
    height: u32,
    /// Length before background music, the sum of slide durations
    duration_secs: u32,
    /// Number of clips joined
    clip_count: usize,
    /// Number of clips carrying a caption overlay
    caption_count: usize,
}

/// Renders slides into one video and publishes it through storage.
///
/// Every slide becomes a clip with an identical encoding profile; clips are joined
/// without re-encoding and the result is uploaded as `video_<job>.mp4`. Intermediate
/// files never outlive the call.
pub struct Compositor {
    encoder: Arc<dyn MediaEncoder>,
    storage: Arc<dyn ObjectStorage>,
    work_dir: PathBuf,
}

impl Compositor {
    /// Compositor writing intermediates under `work_dir`.
    pub fn new(
        encoder: Arc<dyn MediaEncoder>,
        storage: Arc<dyn ObjectStorage>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            encoder,
            storage,
            work_dir: work_dir.into(),
        }
    }

    /// Composes `slides` in order into one video for `job_id`.
    ///
    /// # Errors
    ///
    /// Returns a composition error for empty input, clips shorter than
    /// [`MIN_CLIP_SECS`], or any encoder failure, and a storage error when inputs
    /// cannot be fetched or the video cannot be uploaded. Nothing is uploaded on error.
    #[tracing::instrument(
        skip(self, slides, config, progress),
        fields(job_id = %job_id, slides = slides.len(), resolution = %config.resolution())
    )]
    pub async fn compose(
        &self,
        slides: &[Slide],
        config: &VideoConfig,
        job_id: &JobId,
        progress: &dyn CompositionProgress,
    ) -> StoryreelResult<Composition> {
        if slides.is_empty() {
            return Err(CompositionError::new(CompositionErrorKind::NoSlides).into());
        }
        if let Some(short) = slides.iter().find(|s| *s.duration_secs() < MIN_CLIP_SECS) {
            return Err(CompositionError::new(CompositionErrorKind::ClipTooShort {
                index: *short.index(),
                seconds: *short.duration_secs(),
            })
            .into());
        }

        let mut scratch = ScratchFiles::new(&self.work_dir, job_id);
        let result = self
            .compose_in(&mut scratch, slides, config, job_id, progress)
            .await;
        let removed = scratch.cleanup().await;

        match &result {
            Ok(composition) => tracing::info!(
                url = %composition.url,
                duration_secs = composition.duration_secs,
                removed,
                "Video composed"
            ),
            Err(e) => tracing::error!(error = %e, removed, "Composition failed"),
        }
        result
    }

    async fn compose_in(
        &self,
        scratch: &mut ScratchFiles,
        slides: &[Slide],
        config: &VideoConfig,
        job_id: &JobId,
        progress: &dyn CompositionProgress,
    ) -> StoryreelResult<Composition> {
        progress.report(0.1, "Preparing slides").await;
        tokio::fs::create_dir_all(scratch.dir()).await.map_err(|e| {
            CompositionError::new(CompositionErrorKind::Io(format!(
                "{}: {}",
                scratch.dir().display(),
                e
            )))
        })?;

        let dimensions = config.resolution().dimensions();
        let total = slides.len();
        let mut clips = Vec::with_capacity(total);
        let mut caption_count = 0;

        for (position, slide) in slides.iter().enumerate() {
            let index = *slide.index();
            let image = scratch.reserve(&format!(
                "img_{index}.{}",
                extension_of(slide.best_image(), "png")
            ));
            self.storage.download(slide.best_image(), &image).await?;

            let narration = match slide.voice_url() {
                Some(url) => {
                    let audio = scratch.reserve(&format!("audio_{index}.{}", extension_of(url, "mp3")));
                    self.storage.download(url, &audio).await?;
                    Some(audio)
                }
                None => None,
            };

            let caption = if *config.subtitle_enabled() && !slide.caption().trim().is_empty() {
                let text_file = scratch.reserve(&format!("caption_{index}.txt"));
                write_scratch(&text_file, slide.caption().trim().as_bytes()).await?;
                caption_count += 1;
                Some(CaptionOverlay {
                    text_file,
                    vertical_fraction: config.subtitle_position().vertical_fraction(),
                })
            } else {
                None
            };

            let clip = scratch.reserve(&format!("slide_{index}.mp4"));
            let recipe = EncodeRecipe::slide_clip(
                image,
                narration,
                caption,
                dimensions,
                *config.frame_rate(),
                *slide.duration_secs(),
                &clip,
            );
            self.encoder
                .encode(&format!("slide {index}"), &recipe)
                .await?;
            tracing::debug!(index, clip = %clip.display(), "Rendered slide clip");
            clips.push(clip);

            let fraction = 0.1 + 0.4 * (position + 1) as f64 / total as f64;
            progress
                .report(fraction, &format!("Rendered slide {}/{}", position + 1, total))
                .await;
        }

        progress.report(0.5, "Joining clips").await;
        let list = scratch.reserve("list.txt");
        let names: Vec<PathBuf> = clips
            .iter()
            .filter_map(|clip| clip.file_name().map(PathBuf::from))
            .collect();
        write_scratch(&list, concat_list(&names).as_bytes()).await?;

        let merged = scratch.reserve("merged.mp4");
        self.encoder
            .encode("concat", &EncodeRecipe::concat(&list, &merged))
            .await?;

        if config.background_music().is_enabled() {
            progress.report(0.7, "Background music").await;
            tracing::info!(
                music = %config.background_music(),
                "Background music selected; the track is published without mixing"
            );
        }

        let url = self
            .storage
            .upload(&merged, &format!("video_{}.mp4", job_id.simple()))
            .await?;
        progress.report(1.0, "Video ready").await;

        Ok(Composition {
            url,
            width: dimensions.0,
            height: dimensions.1,
            duration_secs: slides.iter().map(|s| *s.duration_secs()).sum(),
            clip_count: clips.len(),
            caption_count,
        })
    }
}

async fn write_scratch(path: &std::path::Path, data: &[u8]) -> StoryreelResult<()> {
    tokio::fs::write(path, data).await.map_err(|e| {
        CompositionError::new(CompositionErrorKind::Io(format!("{}: {}", path.display(), e))).into()
    })
}

/// File extension of a URL or path, or `fallback` when it has none.
fn extension_of<'a>(location: &'a str, fallback: &'a str) -> &'a str {
    let path = location.split(['?', '#']).next().unwrap_or(location);
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 5
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext
        }
        _ => fallback,
    }
}
