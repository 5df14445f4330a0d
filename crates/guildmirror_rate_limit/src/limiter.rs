//! Request rate limiter using governor.
//!
//! The GCRA (Generic Cell Rate Algorithm) gives lock-free limiting with no
//! background task; callers simply await a cell before each request.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

// Type alias for our direct rate limiter
type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Caps the number of directory requests per minute.
///
/// A limit of zero means unlimited. Cloning shares the same quota.
///
/// # Example
///
/// ```
/// use guildmirror_rate_limit::RequestLimiter;
///
/// # #[tokio::main]
/// # async fn main() {
/// let limiter = RequestLimiter::per_minute(45);
/// limiter.acquire().await;
/// // make the request...
/// # }
/// ```
#[derive(Clone, Default)]
pub struct RequestLimiter {
    limiter: Option<Arc<DirectRateLimiter>>,
}

impl std::fmt::Debug for RequestLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLimiter")
            .field("limited", &self.is_limited())
            .finish()
    }
}

impl RequestLimiter {
    /// Allow `rpm` requests per minute, bursting up to the full minute's quota.
    pub fn per_minute(rpm: u32) -> Self {
        let limiter = NonZeroU32::new(rpm).map(|n| {
            let quota = Quota::per_minute(n);
            Arc::new(GovernorRateLimiter::direct(quota))
        });
        Self { limiter }
    }

    /// No limit.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Whether a quota is enforced.
    pub fn is_limited(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait until the quota allows one more request.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            if limiter.check().is_err() {
                debug!("Request quota exhausted, waiting");
                limiter.until_ready().await;
            }
        }
    }

    /// Take one request from the quota without waiting.
    ///
    /// Returns false if the request would exceed the quota.
    pub fn try_acquire(&self) -> bool {
        match &self.limiter {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }
}
