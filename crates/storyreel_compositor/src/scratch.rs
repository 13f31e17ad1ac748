//! Per-job scratch files.

use std::path::{Path, PathBuf};
use storyreel_core::JobId;

/// Tracks every intermediate file a composition creates.
///
/// Files are named `temp_<job>_<suffix>` inside the work directory. Call
/// [`ScratchFiles::cleanup`] when composition ends; if the composition future is dropped
/// instead, the remaining files are removed on drop.
#[derive(Debug)]
pub struct ScratchFiles {
    dir: PathBuf,
    prefix: String,
    paths: Vec<PathBuf>,
}

impl ScratchFiles {
    /// Scratch set for `job_id` under `dir`.
    pub fn new(dir: impl Into<PathBuf>, job_id: &JobId) -> Self {
        Self {
            dir: dir.into(),
            prefix: format!("temp_{}", job_id.simple()),
            paths: Vec::new(),
        }
    }

    /// Directory holding the files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserves `temp_<job>_<suffix>` and returns its path.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyreel_compositor::ScratchFiles;
    /// use storyreel_core::JobId;
    ///
    /// let job = JobId::new();
    /// let mut scratch = ScratchFiles::new("/tmp/work", &job);
    /// let clip = scratch.reserve("slide_0.mp4");
    /// assert_eq!(
    ///     clip.file_name().unwrap().to_string_lossy(),
    ///     format!("temp_{}_slide_0.mp4", job.simple())
    /// );
    /// assert_eq!(scratch.len(), 1);
    /// ```
    pub fn reserve(&mut self, suffix: &str) -> PathBuf {
        let path = self.dir.join(format!("{}_{}", self.prefix, suffix));
        self.paths.push(path.clone());
        path
    }

    /// Number of reserved files.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when nothing has been reserved.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Deletes every reserved file that exists and returns how many were removed.
    ///
    /// Removal failures are logged, never returned.
    pub async fn cleanup(mut self) -> usize {
        let mut removed = 0;
        for path in std::mem::take(&mut self.paths) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove scratch file")
                }
            }
        }
        tracing::debug!(removed, "Removed scratch files");
        removed
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove scratch file")
                }
            }
        }
    }
}
