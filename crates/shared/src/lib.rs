//! Shared library for the anime catalog workspace.
//!
//! This crate provides common functionality used by the catalog client and
//! its command-line front-end:
//! - Configuration management
//! - Catalog data models
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::{CatalogConfig, Config};
pub use logging::LogConfig;
pub use models::*;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
