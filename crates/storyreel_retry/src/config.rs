//! Layered TOML configuration.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from storyreel.toml)
//! - User overrides (~/.config/storyreel/storyreel.toml, then ./storyreel.toml)
//! - Environment overrides (`STORYREEL__SECTION__KEY`)

use crate::{JobRetryPolicy, PollPolicy};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storyreel_error::{ConfigError, StoryreelError, StoryreelResult};
use tracing::{debug, instrument};

/// Remote AI provider settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider name
    pub name: String,
    /// API root, without trailing slash
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Model used for image expansion
    pub image_model: String,
    /// Output size requested from image expansion
    pub image_size: String,
    /// Model used for speech synthesis
    pub tts_model: String,
    /// Longest text (in characters) sent to the synchronous speech endpoint
    pub sync_tts_max_chars: usize,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
    /// Client-side request cap; 0 disables it
    pub requests_per_minute: u32,
}

/// Remote task polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Delay before each poll
    pub interval_ms: u64,
    /// Polls before giving up
    pub max_attempts: usize,
}

/// Whole-job retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JobRetryConfig {
    /// Re-runs after the first attempt
    pub max_retries: usize,
    /// Delay between attempts
    pub backoff_secs: u64,
    /// Hard ceiling for a single attempt
    pub time_limit_secs: u64,
}

/// Worker pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Jobs that may run at the same time
    pub slots: usize,
}

/// Local storage backend settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding uploaded objects
    pub upload_dir: PathBuf,
    /// Public URL prefix for uploaded objects
    pub base_url: String,
    /// Timeout for downloading remote objects
    pub download_timeout_secs: u64,
}

/// Video rendering settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Scratch directory for intermediate files
    pub work_dir: PathBuf,
    /// Encoder executable
    pub ffmpeg_path: String,
}

/// Top-level Storyreel configuration.
///
/// # Example
///
/// ```no_run
/// use storyreel_retry::StoryreelConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryreelConfig::load()?;
/// println!("Polling every {}ms", config.polling.interval_ms);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StoryreelConfig {
    /// Remote provider
    pub provider: ProviderConfig,
    /// Remote task polling
    pub polling: PollingConfig,
    /// Whole-job retry
    pub job_retry: JobRetryConfig,
    /// Worker pool
    pub workers: WorkerConfig,
    /// Storage backend
    pub storage: StorageConfig,
    /// Rendering
    pub render: RenderConfig,
}

// Bundled default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../storyreel.toml");

impl StoryreelConfig {
    /// Bundled defaults only, ignoring user files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file cannot be parsed.
    pub fn bundled() -> StoryreelResult<Self> {
        let config = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .map_err(|e| {
                StoryreelError::from(ConfigError::new(format!(
                    "Failed to build bundled configuration: {}",
                    e
                )))
            })?;
        Self::finish(config)
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or a value is invalid.
    #[instrument]
    pub fn load() -> StoryreelResult<Self> {
        Self::load_with(None)
    }

    /// Like [`StoryreelConfig::load`], but an explicit `path` replaces the home and
    /// current-directory lookup. The file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a value is invalid.
    #[instrument]
    pub fn load_with(path: Option<&Path>) -> StoryreelResult<Self> {
        debug!("Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(home) = dirs::home_dir() {
                    let home_config = home.join(".config/storyreel/storyreel.toml");
                    builder = builder.add_source(File::from(home_config).required(false));
                }
                builder = builder.add_source(File::with_name("storyreel").required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("STORYREEL")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(|e| {
            StoryreelError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?;
        Self::finish(config)
    }

    fn finish(config: Config) -> StoryreelResult<Self> {
        let parsed: Self = config.try_deserialize().map_err(|e| {
            StoryreelError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Rejects values that would stall or disable the pipeline.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::for_setting("polling.interval_ms", "must be positive"));
        }
        if self.polling.max_attempts == 0 {
            return Err(ConfigError::for_setting("polling.max_attempts", "must be positive"));
        }
        if self.workers.slots == 0 {
            return Err(ConfigError::for_setting("workers.slots", "must be positive"));
        }
        if self.job_retry.time_limit_secs == 0 {
            return Err(ConfigError::for_setting("job_retry.time_limit_secs", "must be positive"));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::for_setting("provider.base_url", "must not be empty"));
        }
        Ok(())
    }

    /// Polling policy described by the `[polling]` section.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.polling.interval_ms),
            self.polling.max_attempts,
        )
    }

    /// Job retry policy described by the `[job_retry]` section.
    pub fn job_retry_policy(&self) -> JobRetryPolicy {
        JobRetryPolicy::new(
            self.job_retry.max_retries,
            Duration::from_secs(self.job_retry.backoff_secs),
            Duration::from_secs(self.job_retry.time_limit_secs),
        )
    }
}
