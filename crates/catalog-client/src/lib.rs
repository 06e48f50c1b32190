//! Anime catalog client library.
//!
//! This library fetches anime listings, details and search results from the
//! Jikan API v4, with response caching, request throttling, retries and
//! deduplication of search results.

pub mod api;
pub mod cache;
pub mod dedup;
pub mod query;

pub use api::{CatalogClient, CatalogError, Clock, HttpTransport, RateLimiter, SystemClock, Transport};
pub use cache::{CacheStats, ResponseCache};
pub use dedup::{deduplicate, normalize_title};
pub use query::{Endpoint, SearchParams, Season};
