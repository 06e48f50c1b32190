//! Time source used by the cache, the rate limiter and the retry loop.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::{Duration, Instant};

/// Monotonic clock, calendar date and sleep, injectable for tests
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current monotonic instant
    fn now(&self) -> Instant;

    /// Today's date in the caller's local time zone
    fn today(&self) -> NaiveDate;

    /// Suspend the caller for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation backed by tokio timers and the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
