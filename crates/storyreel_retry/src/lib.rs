//! Configuration, bounded polling and retry policy.
//!
//! Remote providers answer slowly and asynchronously. This crate owns the knobs that
//! bound how long Storyreel waits on them:
//!
//! - [`PollPolicy`] polls a remote task on a fixed interval for a fixed number of
//!   attempts.
//! - [`JobRetryPolicy`] re-runs a whole job after a fixed backoff.
//! - [`RequestLimiter`] caps request rate against a provider.
//! - [`StoryreelConfig`] loads all of the above from layered TOML.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod job_retry;
mod limiter;
mod poll;

pub use config::{
    JobRetryConfig, PollingConfig, ProviderConfig, RenderConfig, StorageConfig, StoryreelConfig,
    WorkerConfig,
};
pub use job_retry::JobRetryPolicy;
pub use limiter::RequestLimiter;
pub use poll::PollPolicy;
