//! Rate limiting for connection attempts.
//!
//! Token bucket pacing on top of the admission gate: the gate caps how many
//! probes run at once, the limiter caps how many start per second.

use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = GovLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Shared connection-attempt pacer.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Create a limiter allowing `rate` attempts per second.
    ///
    /// Returns `None` for a rate of zero, which means unlimited.
    pub fn new(rate: u32) -> Option<Self> {
        let rate = NonZeroU32::new(rate)?;
        Some(Self {
            limiter: Arc::new(GovLimiter::direct(Quota::per_second(rate))),
        })
    }

    /// Wait until the limiter allows another attempt.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}
