//! Fixed-interval rate limiter.
//!
//! Enforces a minimum spacing between two consecutive outbound requests,
//! measured from the most recent dispatch regardless of which operation
//! issued it.

use super::clock::Clock;
use std::time::{Duration, Instant};

/// Rate limiter holding the timestamp of the last dispatched request
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum spacing between two dispatches
    min_interval: Duration,
    /// Last request timestamp
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Wait until a request can be made, then record the dispatch time
    pub async fn acquire(&mut self, clock: &dyn Clock) {
        if let Some(last) = self.last_request {
            let elapsed = clock.now().saturating_duration_since(last);

            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait_time.as_millis(),
                    "Rate limit: waiting before dispatch"
                );
                clock.sleep(wait_time).await;
            }
        }

        // Recorded whether or not we had to wait
        self.last_request = Some(clock.now());
    }
}
