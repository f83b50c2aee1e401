//! Shared request budget for AI collaborators.

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as GovLimiter};

/// Token bucket shared by every research and judgment call in a run.
///
/// Cloning shares the same bucket. A limiter built with a zero budget
/// never waits.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    inner: Option<Arc<DefaultDirectRateLimiter>>,
}

impl RateLimiter {
    /// Allow `requests_per_minute` calls per minute, with the full minute's
    /// budget available as an initial burst.
    #[must_use]
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let inner = NonZeroU32::new(requests_per_minute)
            .map(|n| Arc::new(GovLimiter::direct(Quota::per_minute(n))));
        Self { inner }
    }

    /// A limiter that never waits.
    #[must_use]
    pub fn unlimited() -> Self {
        Self { inner: None }
    }

    #[must_use]
    pub fn is_limited(&self) -> bool {
        self.inner.is_some()
    }

    /// Wait until a request slot is available.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.inner {
            limiter.until_ready().await;
        }
    }

    /// Take a slot without waiting. Returns true if acquired.
    pub fn try_acquire(&self) -> bool {
        match &self.inner {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }
}
