//! Declarative encoder recipes.
//!
//! A recipe lists inputs, filter chains and an output profile. [`EncodeRecipe::to_args`]
//! renders it into ffmpeg arguments; test encoders inspect the recipe directly.

use derive_getters::Getters;
use std::path::{Path, PathBuf};

/// Fade length at both ends of every clip, in seconds.
pub const FADE_SECS: f64 = 0.5;

/// Audio sample rate shared by every clip.
pub const AUDIO_SAMPLE_RATE: u32 = 44_100;

const CAPTION_FONT_SIZE: u32 = 48;

/// One encoder input.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeInput {
    /// Still image looped for `seconds`
    Image {
        /// Local image file
        path: PathBuf,
        /// Frame rate of the looped stream
        frame_rate: u32,
        /// Clip length
        seconds: u32,
    },
    /// Audio file
    Audio {
        /// Local audio file
        path: PathBuf,
    },
    /// Generated stereo silence
    Silence {
        /// Length of the silence
        seconds: u32,
    },
    /// Concat demuxer list file
    ConcatList {
        /// List of clips, one `file '<name>'` line per clip
        path: PathBuf,
    },
}

impl RecipeInput {
    fn push_args(&self, args: &mut Vec<String>) {
        match self {
            Self::Image {
                path,
                frame_rate,
                seconds,
            } => {
                args.extend([
                    "-loop".to_string(),
                    "1".to_string(),
                    "-framerate".to_string(),
                    frame_rate.to_string(),
                    "-t".to_string(),
                    seconds.to_string(),
                    "-i".to_string(),
                    path.to_string_lossy().to_string(),
                ]);
            }
            Self::Audio { path } => {
                args.extend(["-i".to_string(), path.to_string_lossy().to_string()]);
            }
            Self::Silence { seconds } => {
                args.extend([
                    "-f".to_string(),
                    "lavfi".to_string(),
                    "-t".to_string(),
                    seconds.to_string(),
                    "-i".to_string(),
                    format!("anullsrc=r={AUDIO_SAMPLE_RATE}:cl=stereo"),
                ]);
            }
            Self::ConcatList { path } => {
                args.extend([
                    "-f".to_string(),
                    "concat".to_string(),
                    "-safe".to_string(),
                    "0".to_string(),
                    "-i".to_string(),
                    path.to_string_lossy().to_string(),
                ]);
            }
        }
    }
}

/// How the output is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputProfile {
    /// H.264 yuv420p video with AAC 44.1kHz stereo audio, cut to `seconds`
    Clip {
        /// Output frame rate
        frame_rate: u32,
        /// Output length
        seconds: u32,
    },
    /// Copy all streams without re-encoding
    StreamCopy,
}

/// A complete encoder invocation.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct EncodeRecipe {
    /// Inputs in ffmpeg input order
    inputs: Vec<RecipeInput>,
    /// Video filter chain applied to input 0
    video_filters: Vec<String>,
    /// Audio filter chain applied to input 1
    audio_filters: Vec<String>,
    /// Output encoding
    profile: OutputProfile,
    /// Output file
    output: PathBuf,
}

/// Caption overlay on a clip.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionOverlay {
    /// File holding the caption text
    pub text_file: PathBuf,
    /// Vertical center of the caption as a fraction of frame height
    pub vertical_fraction: f64,
}

impl EncodeRecipe {
    /// Recipe for one slide clip.
    ///
    /// The image is scaled to fit `width`x`height`, padded to the exact size, and faded
    /// in and out. Narration is padded with silence and trimmed to the clip length; a
    /// slide without narration gets a silent track.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_compositor::EncodeRecipe;
    ///
    /// let recipe = EncodeRecipe::slide_clip("a.png", None, None, (1280, 720), 30, 5, "clip.mp4");
    /// assert!(recipe.video_filters().contains(&"fade=t=out:st=4.5:d=0.5".to_string()));
    /// assert!(recipe.to_args().contains(&"libx264".to_string()));
    /// ```
    pub fn slide_clip(
        image: impl Into<PathBuf>,
        narration: Option<PathBuf>,
        caption: Option<CaptionOverlay>,
        (width, height): (u32, u32),
        frame_rate: u32,
        seconds: u32,
        output: impl Into<PathBuf>,
    ) -> Self {
        let mut video_filters = vec![
            format!("fps={frame_rate}"),
            format!("scale={width}:{height}:force_original_aspect_ratio=decrease"),
            format!("pad={width}:{height}:(ow-iw)/2:(oh-ih)/2"),
            "setsar=1".to_string(),
        ];
        if let Some(caption) = caption {
            video_filters.push(drawtext(&caption));
        }
        video_filters.push(format!("fade=t=in:st=0:d={FADE_SECS}"));
        video_filters.push(format!(
            "fade=t=out:st={}:d={FADE_SECS}",
            f64::from(seconds) - FADE_SECS
        ));

        let mut inputs = vec![RecipeInput::Image {
            path: image.into(),
            frame_rate,
            seconds,
        }];
        let audio_filters = match narration {
            Some(path) => {
                inputs.push(RecipeInput::Audio { path });
                vec![
                    format!("aresample={AUDIO_SAMPLE_RATE}"),
                    "apad".to_string(),
                    format!("atrim=0:{seconds}"),
                ]
            }
            None => {
                inputs.push(RecipeInput::Silence { seconds });
                Vec::new()
            }
        };

        Self {
            inputs,
            video_filters,
            audio_filters,
            profile: OutputProfile::Clip {
                frame_rate,
                seconds,
            },
            output: output.into(),
        }
    }

    /// Recipe joining the clips named in `list` without re-encoding.
    pub fn concat(list: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            inputs: vec![RecipeInput::ConcatList { path: list.into() }],
            video_filters: Vec::new(),
            audio_filters: Vec::new(),
            profile: OutputProfile::StreamCopy,
            output: output.into(),
        }
    }

    /// Number of caption overlays in the video chain.
    pub fn caption_count(&self) -> usize {
        self.video_filters
            .iter()
            .filter(|f| f.starts_with("drawtext="))
            .count()
    }

    /// Renders the recipe as ffmpeg command-line arguments.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
        ];

        for input in &self.inputs {
            input.push_args(&mut args);
        }

        if !self.video_filters.is_empty() {
            args.push("-vf".to_string());
            args.push(self.video_filters.join(","));
        }
        if !self.audio_filters.is_empty() {
            args.push("-af".to_string());
            args.push(self.audio_filters.join(","));
        }

        match self.profile {
            OutputProfile::Clip {
                frame_rate,
                seconds,
            } => {
                args.extend(
                    [
                        "-map", "0:v:0", "-map", "1:a:0", "-c:v", "libx264", "-pix_fmt",
                        "yuv420p", "-c:a", "aac", "-ac", "2",
                    ]
                    .map(String::from),
                );
                args.extend([
                    "-ar".to_string(),
                    AUDIO_SAMPLE_RATE.to_string(),
                    "-r".to_string(),
                    frame_rate.to_string(),
                    "-t".to_string(),
                    seconds.to_string(),
                ]);
            }
            OutputProfile::StreamCopy => {
                args.extend(["-c".to_string(), "copy".to_string()]);
            }
        }

        args.push(self.output.to_string_lossy().to_string());
        args
    }
}

/// Caption text is drawn verbatim: `expansion=none` keeps `%` and `\` literal.
fn drawtext(caption: &CaptionOverlay) -> String {
    format!(
        "drawtext=textfile='{}':expansion=none:fontcolor=white:fontsize={CAPTION_FONT_SIZE}:\
         x=(w-text_w)/2:y=h*{}-text_h/2:box=1:boxcolor=black@0.5:boxborderw=10",
        quote_filter_path(&caption.text_file),
        caption.vertical_fraction
    )
}

/// Makes a path safe inside a single-quoted filter option.
///
/// Only the quote itself is escaped; `:` and `,` stay literal inside the quotes.
fn quote_filter_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .replace('\'', "'\\''")
}

/// Concat demuxer list naming `clips` in order.
///
/// # Examples
///
/// ```
/// use storyreel_compositor::concat_list;
///
/// let list = concat_list(&["a.mp4".into(), "b.mp4".into()]);
/// assert_eq!(list, "file 'a.mp4'\nfile 'b.mp4'\n");
/// ```
pub fn concat_list(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|clip| {
            format!(
                "file '{}'\n",
                clip.to_string_lossy().replace('\'', "'\\''")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawtext_keeps_colons_and_disables_expansion() {
        let overlay = CaptionOverlay {
            text_file: PathBuf::from("/work/C:drive/caption_0.txt"),
            vertical_fraction: 0.5,
        };
        let filter = drawtext(&overlay);
        assert!(filter.starts_with("drawtext=textfile='/work/C:drive/caption_0.txt':"));
        assert!(filter.contains(":expansion=none:"));
        assert!(!filter.contains("\\:"));
    }

    #[test]
    fn test_quote_filter_path_escapes_quotes() {
        assert_eq!(
            quote_filter_path(Path::new("/tmp/it's.txt")),
            "/tmp/it'\\''s.txt"
        );
    }
}
