//! Jikan API v4 client implementation.
//!
//! This module provides a cached, rate-limited, retry-enabled client for the
//! Jikan API (unofficial MyAnimeList API).

pub mod client;
pub mod clock;
pub mod error;
pub mod rate_limiter;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::CatalogClient;
pub use clock::{Clock, SystemClock};
pub use error::CatalogError;
pub use rate_limiter::RateLimiter;
pub use transport::{HttpTransport, Transport};
