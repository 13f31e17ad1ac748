//! Local directory storage backend.

use crate::ObjectStorage;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storyreel_error::{StorageError, StorageErrorKind, StoryreelResult};
use uuid::Uuid;

/// Storage backend that keeps objects in one directory.
///
/// Objects are published as `{base_url}/uploads/{name}`. Downloads accept this
/// backend's own URLs, bare object names, `http(s)` URLs and existing local paths.
/// Local files never expire, so signed URLs are the public URLs.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    upload_dir: PathBuf,
    base_url: String,
    http: reqwest::Client,
}

impl LocalStorage {
    /// Creates the backend, creating `upload_dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(upload_dir, base_url))]
    pub fn new(upload_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> StoryreelResult<Self> {
        Self::with_download_timeout(upload_dir, base_url, Duration::from_secs(30))
    }

    /// Like [`LocalStorage::new`] with a custom timeout for remote downloads.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or the HTTP client cannot be built.
    pub fn with_download_timeout(
        upload_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> StoryreelResult<Self> {
        let upload_dir = upload_dir.into();
        let base_url = base_url.into().trim_end_matches('/').to_string();

        std::fs::create_dir_all(&upload_dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                upload_dir.display(),
                e
            )))
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::new(StorageErrorKind::Unavailable(e.to_string())))?;

        tracing::info!(path = %upload_dir.display(), base_url = %base_url, "Created local storage");
        Ok(Self {
            upload_dir,
            base_url,
            http,
        })
    }

    /// Directory holding the objects.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    fn url_prefix(&self) -> String {
        format!("{}/uploads/", self.base_url)
    }

    fn path_for(&self, name: &str) -> StoryreelResult<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(StorageError::new(StorageErrorKind::InvalidName(name.to_string())).into());
        }
        Ok(self.upload_dir.join(name))
    }

    /// Object name for a URL served by this backend, or a bare name.
    fn own_name<'a>(&self, url: &'a str) -> Option<&'a str> {
        if let Some(name) = url.strip_prefix(&self.url_prefix()) {
            return Some(name);
        }
        if url.contains("://") || url.contains('/') || url.contains('\\') {
            return None;
        }
        Some(url)
    }

    async fn write_atomic(&self, path: &Path, data: &[u8]) -> StoryreelResult<()> {
        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        let written = match tokio::fs::write(&temp_path, data).await {
            Ok(()) => tokio::fs::rename(&temp_path, path).await.map_err(|e| {
                format!("rename {} to {}: {}", temp_path.display(), path.display(), e)
            }),
            Err(e) => Err(format!("{}: {}", temp_path.display(), e)),
        };

        if let Err(message) = written {
            if let Err(e) = tokio::fs::remove_file(&temp_path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
                }
            }
            return Err(StorageError::new(StorageErrorKind::FileWrite(message)).into());
        }
        Ok(())
    }

    async fn read(path: &Path) -> StoryreelResult<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.display().to_string())).into()
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
                    .into()
            }
        })
    }

    async fn fetch_remote(&self, url: &str) -> StoryreelResult<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Download(format!("{}: {}", url, e))))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::new(StorageErrorKind::Download(format!(
                "{}: HTTP {}",
                url, status
            )))
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Download(format!("{}: {}", url, e))))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl ObjectStorage for LocalStorage {
    #[tracing::instrument(skip(self), fields(source = %local_path.display()))]
    async fn upload(&self, local_path: &Path, name: &str) -> StoryreelResult<String> {
        let data = Self::read(local_path).await?;
        self.upload_bytes(&data, name).await
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn upload_bytes(&self, data: &[u8], name: &str) -> StoryreelResult<String> {
        let path = self.path_for(name)?;
        self.write_atomic(&path, data).await?;

        let url = self.public_url(name);
        tracing::info!(path = %path.display(), url = %url, size = data.len(), "Stored object");
        Ok(url)
    }

    #[tracing::instrument(skip(self), fields(target = %local_path.display()))]
    async fn download(&self, url: &str, local_path: &Path) -> StoryreelResult<PathBuf> {
        let data = if let Some(name) = self.own_name(url) {
            let stored = self.path_for(name)?;
            let stored_exists = tokio::fs::try_exists(&stored).await.unwrap_or(false);
            if !stored_exists && !url.starts_with(&self.url_prefix()) && Path::new(url).is_file() {
                // Bare relative path outside the upload directory
                Self::read(Path::new(url)).await?
            } else {
                Self::read(&stored).await?
            }
        } else if url.starts_with("http://") || url.starts_with("https://") {
            self.fetch_remote(url).await?
        } else {
            Self::read(Path::new(url)).await?
        };

        if let Some(parent) = local_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }
        self.write_atomic(local_path, &data).await?;

        tracing::debug!(size = data.len(), "Downloaded object");
        Ok(local_path.to_path_buf())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, url: &str) -> StoryreelResult<bool> {
        let Some(name) = self.own_name(url) else {
            tracing::debug!("Not an object of this backend, nothing to delete");
            return Ok(false);
        };
        let path = self.path_for(name)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Deleted object");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "delete {}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    async fn signed_url(&self, name: &str, _ttl: Duration) -> StoryreelResult<String> {
        self.path_for(name)?;
        Ok(self.public_url(name))
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}{}", self.url_prefix(), name)
    }
}
