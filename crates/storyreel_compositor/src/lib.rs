//! Video composition for Storyreel.
//!
//! The [`Compositor`] turns enriched slides into one video:
//!
//! 1. each slide becomes a clip (scaled and padded to the job resolution, faded in and
//!    out, optionally captioned, narration or silence as audio),
//! 2. clips are joined in order without re-encoding,
//! 3. the result is uploaded through [`ObjectStorage`](storyreel_storage::ObjectStorage).
//!
//! Encoding goes through the [`MediaEncoder`] trait. [`FfmpegEncoder`] runs
//! [`EncodeRecipe`]s with an ffmpeg executable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compositor;
mod encoder;
mod recipe;
mod scratch;

pub use compositor::{Composition, Compositor, MIN_CLIP_SECS};
pub use encoder::{FfmpegEncoder, MediaEncoder};
pub use recipe::{
    AUDIO_SAMPLE_RATE, CaptionOverlay, EncodeRecipe, FADE_SECS, OutputProfile, RecipeInput,
    concat_list,
};
pub use scratch::ScratchFiles;
