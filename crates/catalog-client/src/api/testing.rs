//! Test doubles for the clock and transport seams.

use super::clock::Clock;
use super::error::CatalogError;
use super::transport::Transport;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Virtual clock: `sleep` advances time instantly and records the delay
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
    today: NaiveDate,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::with_date(NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"))
    }

    pub fn with_date(today: NaiveDate) -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
            today,
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }

    fn today(&self) -> NaiveDate {
        self.today
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        self.advance(duration);
        tokio::task::yield_now().await;
    }
}

type Responder = Box<dyn Fn(&str) -> Result<Value, CatalogError> + Send + Sync>;

/// Transport answering from a closure and recording every dispatch
pub struct MockTransport {
    clock: Arc<ManualClock>,
    responder: Responder,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl MockTransport {
    pub fn new(
        clock: Arc<ManualClock>,
        responder: impl Fn(&str) -> Result<Value, CatalogError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            clock,
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|(url, _)| url).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, url: &str) -> Result<Value, CatalogError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), self.clock.now()));
        // Let concurrent callers interleave while the "request" is in flight
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        (self.responder)(url)
    }
}
