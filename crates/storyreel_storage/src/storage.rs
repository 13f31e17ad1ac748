//! Storage trait definition.

use std::path::{Path, PathBuf};
use std::time::Duration;
use storyreel_error::StoryreelResult;

/// Trait for pluggable object storage backends.
///
/// Objects are addressed by a flat name on the way in and by URL on the way out.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Uploads the file at `local_path` as `name` and returns its URL.
    async fn upload(&self, local_path: &Path, name: &str) -> StoryreelResult<String>;

    /// Uploads in-memory bytes as `name` and returns its URL.
    async fn upload_bytes(&self, data: &[u8], name: &str) -> StoryreelResult<String>;

    /// Copies the object at `url` to `local_path`.
    ///
    /// # Returns
    ///
    /// The path the object was written to.
    async fn download(&self, url: &str, local_path: &Path) -> StoryreelResult<PathBuf>;

    /// Deletes the object at `url`.
    ///
    /// # Returns
    ///
    /// `true` if an object was removed, `false` if there was nothing to remove.
    async fn delete(&self, url: &str) -> StoryreelResult<bool>;

    /// URL granting temporary access to `name` for `ttl`.
    async fn signed_url(&self, name: &str, ttl: Duration) -> StoryreelResult<String>;

    /// Permanent public URL of `name`.
    fn public_url(&self, name: &str) -> String;
}
