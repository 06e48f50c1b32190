//! Data models for catalog payloads.
//!
//! Only the fields the client inspects are typed. Every other field sent by
//! the remote API is kept in an opaque map and passed through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Single anime entry as returned by the remote catalog
///
/// The remote object is kept exactly as received. The fields used for
/// deduplication are read through accessors, which yield `None` when a
/// field is missing or has an unexpected type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRecord {
    fields: Map<String, Value>,
}

impl CatalogRecord {
    /// Raw access to any remote field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn mal_id(&self) -> Option<u64> {
        self.get("mal_id").and_then(Value::as_u64)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    pub fn title_english(&self) -> Option<&str> {
        self.get("title_english").and_then(Value::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.get("status").and_then(Value::as_str)
    }

    /// Title used for grouping: English when present, otherwise the default title
    pub fn display_title(&self) -> &str {
        self.title_english()
            .filter(|t| !t.is_empty())
            .or(self.title())
            .unwrap_or("")
    }

    pub fn airing_status(&self) -> AiringStatus {
        self.status()
            .map(AiringStatus::from_label)
            .unwrap_or(AiringStatus::Other)
    }
}

/// Paged list of records (top, seasonal, upcoming and search results)
///
/// Only `data` is typed. Pagination and any other top-level key stay in
/// `extra` as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub data: Vec<CatalogRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogPage {
    /// Remote pagination flag; absent or malformed means no further page
    pub fn has_next_page(&self) -> bool {
        self.extra
            .get("pagination")
            .and_then(|p| p.get("has_next_page"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// Simple data wrapper (detail, characters, staff, genres)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Genre entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(alias = "id")]
    pub mal_id: u32,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Airing status as reported by the remote catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AiringStatus {
    Other,
    FinishedAiring,
    CurrentlyAiring,
    NotYetAired,
}

impl AiringStatus {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Not yet aired" => AiringStatus::NotYetAired,
            "Currently Airing" => AiringStatus::CurrentlyAiring,
            "Finished Airing" => AiringStatus::FinishedAiring,
            _ => AiringStatus::Other,
        }
    }

    /// Deduplication priority: upcoming > airing > finished > anything else
    pub fn priority(&self) -> u8 {
        match self {
            AiringStatus::NotYetAired => 3,
            AiringStatus::CurrentlyAiring => 2,
            AiringStatus::FinishedAiring => 1,
            AiringStatus::Other => 0,
        }
    }
}
