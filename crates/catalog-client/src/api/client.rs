//! Jikan API client with caching, rate limiting and retry logic.

use super::clock::{Clock, SystemClock};
use super::error::CatalogError;
use super::rate_limiter::RateLimiter;
use super::transport::{HttpTransport, Transport};
use crate::cache::{CacheStats, ResponseCache};
use crate::dedup;
use crate::query::{Endpoint, SearchParams, Season};
use chrono::Datelike;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{CatalogConfig, CatalogPage, CatalogRecord, DataResponse, Genre};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Jikan API v4 client
///
/// Every operation goes through one request path: a fresh cache entry is
/// returned as-is, otherwise the request waits for the rate limiter and is
/// retried on failure before the result is cached.
pub struct CatalogClient {
    /// Base URL for Jikan API
    base_url: String,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    /// Responses keyed by endpoint
    cache: Mutex<ResponseCache>,
    /// Held for the whole miss path: re-check, throttle, fetch, retry, store
    dispatch: tokio::sync::Mutex<RateLimiter>,
    /// Additional attempts after the first failure
    max_retries: u32,
    /// Fixed delay between attempts
    retry_delay: Duration,
}

impl CatalogClient {
    /// Create a new client using the reqwest transport and the system clock
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_parts(
            config,
            Arc::new(transport),
            Arc::new(SystemClock),
        ))
    }

    /// Create a client with an explicit transport and clock
    pub fn with_parts(
        config: &CatalogConfig,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            transport,
            clock,
            cache: Mutex::new(ResponseCache::new(config.cache_ttl())),
            dispatch: tokio::sync::Mutex::new(RateLimiter::new(config.rate_limit_interval())),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        }
    }

    fn cache_lock(&self) -> MutexGuard<'_, ResponseCache> {
        // The cache holds plain data; a panic elsewhere cannot leave it torn
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn cached(&self, endpoint: &str) -> Option<Value> {
        self.cache_lock().get(endpoint, self.clock.now())
    }

    /// Cached, throttled, retried GET of an endpoint, typed as `T`
    ///
    /// Only payloads that decode as `T` are cached, so a malformed response
    /// is fetched again on the next call.
    async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, CatalogError> {
        if let Some(payload) = self.cached(endpoint) {
            return decode(endpoint, &payload);
        }

        let mut limiter = self.dispatch.lock().await;

        // Another caller may have fetched this endpoint while we waited
        if let Some(payload) = self.cached(endpoint) {
            return decode(endpoint, &payload);
        }

        let payload = self.fetch_with_retry(&mut limiter, endpoint).await?;
        let decoded = decode(endpoint, &payload).map_err(|e| {
            warn!(endpoint = endpoint, error = %e, "Response has unexpected shape, not caching");
            e
        })?;

        self.cache_lock()
            .insert(endpoint, payload, self.clock.now());

        Ok(decoded)
    }

    async fn fetch_with_retry(
        &self,
        limiter: &mut RateLimiter,
        endpoint: &str,
    ) -> Result<Value, CatalogError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let max_attempts = self.max_retries + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;

            // Apply rate limiting before each attempt
            limiter.acquire(self.clock.as_ref()).await;

            debug!(url = %url, attempt = attempt, "Making API request");

            match self.transport.get_json(&url).await {
                Ok(payload) => {
                    debug!(url = %url, "Request successful");
                    return Ok(payload);
                }
                Err(e) => {
                    warn!(url = %url, attempt = attempt, error = %e, "Request failed");

                    if attempt >= max_attempts {
                        return Err(CatalogError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(e),
                        });
                    }

                    debug!(
                        delay_ms = self.retry_delay.as_millis(),
                        "Retrying after delay"
                    );
                    self.clock.sleep(self.retry_delay).await;
                }
            }
        }
    }

    /// Id-based lookup; any HTTP failure is reported as not found
    async fn lookup<T: DeserializeOwned>(&self, id: u32, endpoint: &str) -> Result<T, CatalogError> {
        self.request(endpoint).await.map_err(|e| match e.status() {
            Some(status) => CatalogError::NotFound { id, status },
            None => e,
        })
    }

    fn check_id(id: u32) -> Result<(), CatalogError> {
        if id == 0 {
            return Err(CatalogError::InvalidInput(
                "anime id must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    /// Fetch the top anime list, optionally narrowed by type and filter
    pub async fn top_anime(
        &self,
        kind: Option<&str>,
        filter: Option<&str>,
        page: u32,
    ) -> Result<CatalogPage, CatalogError> {
        if page == 0 {
            return Err(CatalogError::InvalidInput(
                "page numbers start at 1".to_string(),
            ));
        }

        info!(kind = ?kind, filter = ?filter, page = page, "Fetching top anime");
        self.request(&Endpoint::top_anime(kind, filter, page)).await
    }

    /// Fetch a season's anime; missing arguments default to today's season
    pub async fn seasonal_anime(
        &self,
        year: Option<i32>,
        season: Option<Season>,
    ) -> Result<CatalogPage, CatalogError> {
        let today = self.clock.today();
        let year = year.unwrap_or_else(|| today.year());
        let season = season.unwrap_or_else(|| Season::from_date(today));

        info!(year = year, season = %season, "Fetching seasonal anime");
        self.request(&Endpoint::seasonal(year, season)).await
    }

    pub async fn upcoming_anime(&self) -> Result<CatalogPage, CatalogError> {
        info!("Fetching upcoming anime");
        self.request(&Endpoint::upcoming()).await
    }

    /// Fetch full anime details by MAL ID
    pub async fn anime_details(&self, id: u32) -> Result<DataResponse<CatalogRecord>, CatalogError> {
        Self::check_id(id)?;
        debug!(mal_id = id, "Fetching anime details");
        self.lookup(id, &Endpoint::anime_full(id)).await
    }

    pub async fn anime_characters(&self, id: u32) -> Result<DataResponse<Vec<Value>>, CatalogError> {
        Self::check_id(id)?;
        debug!(mal_id = id, "Fetching anime characters");
        self.lookup(id, &Endpoint::anime_characters(id)).await
    }

    pub async fn anime_staff(&self, id: u32) -> Result<DataResponse<Vec<Value>>, CatalogError> {
        Self::check_id(id)?;
        debug!(mal_id = id, "Fetching anime staff");
        self.lookup(id, &Endpoint::anime_staff(id)).await
    }

    /// Search anime by free text; an empty query lists everything
    pub async fn search_anime(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<CatalogPage, CatalogError> {
        info!(query = query, "Searching anime");
        self.request(&Endpoint::search(query, params)).await
    }

    /// Fetch all genres
    pub async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        info!("Fetching anime genres");
        let response: DataResponse<Vec<Genre>> = self.request(&Endpoint::genres()).await?;
        Ok(response.data)
    }

    /// Collapse search results that name the same series
    pub fn deduplicate(records: &[CatalogRecord]) -> Vec<CatalogRecord> {
        dedup::deduplicate(records)
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache_lock().stats(self.clock.now())
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, payload: &Value) -> Result<T, CatalogError> {
    serde::Deserialize::deserialize(payload).map_err(|e| CatalogError::Decode(format!("{}: {}", endpoint, e)))
}
