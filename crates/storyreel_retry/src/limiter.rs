//! Client-side request limiter for remote providers.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

// Type alias for our direct rate limiter
type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Requests-per-minute cap shared by every clone.
///
/// A limit of zero disables limiting.
///
/// # Examples
///
/// ```
/// use storyreel_retry::RequestLimiter;
///
/// let unlimited = RequestLimiter::per_minute(0);
/// assert!(!unlimited.is_limited());
/// assert!(unlimited.try_acquire());
/// ```
#[derive(Clone, Default)]
pub struct RequestLimiter {
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
}

impl std::fmt::Debug for RequestLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLimiter")
            .field("limited", &self.is_limited())
            .finish()
    }
}

impl RequestLimiter {
    /// Allows `rpm` requests per minute.
    pub fn per_minute(rpm: u32) -> Self {
        let rpm_limiter = NonZeroU32::new(rpm).map(|n| {
            let quota = Quota::per_minute(n);
            Arc::new(GovernorRateLimiter::direct(quota))
        });
        Self { rpm_limiter }
    }

    /// True when a cap is configured.
    pub fn is_limited(&self) -> bool {
        self.rpm_limiter.is_some()
    }

    /// Waits until a request is allowed.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }
    }

    /// Takes a request slot without waiting, if one is free.
    pub fn try_acquire(&self) -> bool {
        match &self.rpm_limiter {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }
}
