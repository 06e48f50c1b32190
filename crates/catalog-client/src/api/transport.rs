//! HTTP transport used by the catalog client.

use super::error::CatalogError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::CatalogConfig;
use std::time::Duration;
use tracing::debug;

/// A single GET returning a JSON body.
///
/// Implementations report a non-success status as
/// [`CatalogError::RequestFailed`] and must not retry on their own.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, CatalogError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport from the catalog configuration
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::build(&config.user_agent, config.request_timeout())
    }

    fn build(user_agent: &str, timeout: Option<Duration>) -> Result<Self, CatalogError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CatalogError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, CatalogError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            debug!(url = %url, status = %status, "Non-success status");
            return Err(CatalogError::RequestFailed {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new(&CatalogConfig::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_transport_with_timeout() {
        let config = CatalogConfig {
            request_timeout_seconds: Some(10),
            ..Default::default()
        };
        assert!(HttpTransport::new(&config).is_ok());
    }
}
