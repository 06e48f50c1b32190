//! Error taxonomy for the catalog client.

use thiserror::Error;

/// Errors that can occur while talking to the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level failure (DNS, refused connection, transport timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote answered with a non-success HTTP status
    #[error("Request failed with status {status}")]
    RequestFailed { status: u16 },

    /// The body was not JSON, or not the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Request failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<CatalogError>,
    },

    #[error("Anime {id} not found (status {status})")]
    NotFound { id: u32, status: u16 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CatalogError {
    /// HTTP status behind this error, looking through retry exhaustion
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::RequestFailed { status } | CatalogError::NotFound { status, .. } => {
                Some(*status)
            }
            CatalogError::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Transport(e.to_string())
        }
    }
}
