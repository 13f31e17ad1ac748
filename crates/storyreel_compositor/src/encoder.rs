//! Encoder trait and the ffmpeg implementation.

use crate::EncodeRecipe;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use storyreel_error::{CompositionError, CompositionErrorKind, StoryreelResult};
use storyreel_retry::RenderConfig;
use tokio::process::Command;

/// Lines of encoder stderr kept as the failure diagnostic.
const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// Runs encode recipes to completion.
#[async_trait]
pub trait MediaEncoder: Send + Sync {
    /// Encodes `recipe`; `stage` names the step in diagnostics (e.g. "slide 2").
    ///
    /// # Errors
    ///
    /// Returns a composition error when the encoder cannot start, exits
    /// unsuccessfully, or leaves no output file.
    async fn encode(&self, stage: &str, recipe: &EncodeRecipe) -> StoryreelResult<()>;
}

/// [`MediaEncoder`] backed by an ffmpeg executable.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    binary: PathBuf,
}

impl FfmpegEncoder {
    /// Encoder invoking `binary`, either a path or a name resolved on `PATH`.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Encoder configured from the `[render]` section.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(&config.ffmpeg_path)
    }

    /// First line of `ffmpeg -version`, confirming the binary runs.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionErrorKind::EncoderUnavailable`] when it does not.
    #[tracing::instrument(skip(self), fields(binary = %self.binary.display()))]
    pub async fn version(&self) -> StoryreelResult<String> {
        let output = Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(CompositionError::new(CompositionErrorKind::EncoderUnavailable(
                format!("{} -version exited with {}", self.binary.display(), output.status),
            ))
            .into());
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().to_string())
    }

    fn unavailable(&self, error: std::io::Error) -> CompositionError {
        CompositionError::new(CompositionErrorKind::EncoderUnavailable(format!(
            "{}: {}",
            self.binary.display(),
            error
        )))
    }
}

#[async_trait]
impl MediaEncoder for FfmpegEncoder {
    #[tracing::instrument(skip(self, recipe), fields(output = %recipe.output().display()))]
    async fn encode(&self, stage: &str, recipe: &EncodeRecipe) -> StoryreelResult<()> {
        let args = recipe.to_args();
        tracing::debug!(command = %format!("{} {}", self.binary.display(), args.join(" ")), "Running encoder");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            let diagnostic = stderr_tail(&output.stderr, DIAGNOSTIC_TAIL_LINES);
            tracing::error!(status = %output.status, diagnostic = %diagnostic, "Encoder failed");
            return Err(CompositionError::new(CompositionErrorKind::EncoderFailed {
                stage: stage.to_string(),
                diagnostic,
            })
            .into());
        }

        let exists = tokio::fs::try_exists(recipe.output()).await.unwrap_or(false);
        if !exists {
            return Err(CompositionError::new(CompositionErrorKind::MissingOutput(
                recipe.output().display().to_string(),
            ))
            .into());
        }

        tracing::debug!("Encoder finished");
        Ok(())
    }
}

/// Last `lines` non-empty lines of `stderr`.
fn stderr_tail(stderr: &[u8], lines: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let kept: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = kept.len().saturating_sub(lines);
    if kept.is_empty() {
        "no diagnostic output".to_string()
    } else {
        kept[start..].join("\n")
    }
}
