//! Endpoint construction.
//!
//! Every operation of the client is reduced to an endpoint key (path plus
//! query string) which is both appended to the base URL and used verbatim
//! as the cache key.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Broadcast season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }

    /// Map a calendar month (1-12) to its season bucket
    pub fn from_month(month: u32) -> Self {
        match month {
            1..=3 => Season::Winter,
            4..=6 => Season::Spring,
            7..=9 => Season::Summer,
            _ => Season::Fall,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            other => Err(format!("Unknown season: {}", other)),
        }
    }
}

/// Optional search filters, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    entries: Vec<(String, Value)>,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, replacing any earlier value under the same name
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Filters that survive the emptiness rules, rendered as query values
    pub fn rendered(&self) -> Vec<(&str, String)> {
        self.entries
            .iter()
            .filter_map(|(name, value)| render_value(name, value).map(|v| (name.as_str(), v)))
            .collect()
    }
}

/// Render a filter value, or `None` when it should be omitted
fn render_value(name: &str, value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::Array(_) | Value::Object(_) => None,
                    other => render_value(name, other),
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(","))
            }
        }
        Value::Object(map) if map.is_empty() => None,
        Value::Object(_) => {
            warn!(param = name, "Skipping non-scalar search parameter");
            None
        }
    }
}

/// Endpoint builders for each remote resource
pub struct Endpoint;

impl Endpoint {
    pub fn top_anime(kind: Option<&str>, filter: Option<&str>, page: u32) -> String {
        let mut endpoint = format!("/top/anime?page={}", page);
        if let Some(kind) = kind.filter(|k| !k.is_empty()) {
            endpoint.push_str(&format!("&type={}", urlencoding::encode(kind)));
        }
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            endpoint.push_str(&format!("&filter={}", urlencoding::encode(filter)));
        }
        endpoint
    }

    pub fn seasonal(year: i32, season: Season) -> String {
        format!("/seasons/{}/{}", year, season)
    }

    pub fn upcoming() -> String {
        "/seasons/upcoming".to_string()
    }

    pub fn anime_full(id: u32) -> String {
        format!("/anime/{}/full", id)
    }

    pub fn anime_characters(id: u32) -> String {
        format!("/anime/{}/characters", id)
    }

    pub fn anime_staff(id: u32) -> String {
        format!("/anime/{}/staff", id)
    }

    /// `q` is always present, even when empty
    pub fn search(query: &str, params: &SearchParams) -> String {
        let mut endpoint = format!("/anime?q={}", urlencoding::encode(query));
        for (name, value) in params.rendered() {
            endpoint.push_str(&format!("&{}={}", name, urlencoding::encode(&value)));
        }
        endpoint
    }

    pub fn genres() -> String {
        "/genres/anime".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(3), Season::Winter);
        assert_eq!(Season::from_month(4), Season::Spring);
        assert_eq!(Season::from_month(6), Season::Spring);
        assert_eq!(Season::from_month(7), Season::Summer);
        assert_eq!(Season::from_month(9), Season::Summer);
        assert_eq!(Season::from_month(10), Season::Fall);
        assert_eq!(Season::from_month(12), Season::Fall);
    }

    #[test]
    fn test_season_parse() {
        assert_eq!("Summer".parse::<Season>(), Ok(Season::Summer));
        assert_eq!("autumn".parse::<Season>(), Ok(Season::Fall));
        assert!("monsoon".parse::<Season>().is_err());
    }

    #[test]
    fn test_top_anime_endpoint() {
        assert_eq!(Endpoint::top_anime(None, None, 1), "/top/anime?page=1");
        assert_eq!(
            Endpoint::top_anime(Some("tv"), Some("airing"), 2),
            "/top/anime?page=2&type=tv&filter=airing"
        );
        assert_eq!(
            Endpoint::top_anime(None, Some("bypopularity"), 3),
            "/top/anime?page=3&filter=bypopularity"
        );
    }

    #[test]
    fn test_fixed_endpoints() {
        assert_eq!(Endpoint::seasonal(2024, Season::Fall), "/seasons/2024/fall");
        assert_eq!(Endpoint::upcoming(), "/seasons/upcoming");
        assert_eq!(Endpoint::anime_full(16498), "/anime/16498/full");
        assert_eq!(Endpoint::anime_characters(5), "/anime/5/characters");
        assert_eq!(Endpoint::anime_staff(5), "/anime/5/staff");
        assert_eq!(Endpoint::genres(), "/genres/anime");
    }

    #[test]
    fn test_empty_query_search() {
        assert_eq!(Endpoint::search("", &SearchParams::new()), "/anime?q=");
    }

    #[test]
    fn test_search_omits_empty_params() {
        let params = SearchParams::new()
            .with("status", "")
            .with("type", Value::Null)
            .with("genres", json!({}))
            .with("producers", json!([]))
            .with("page", 2);

        assert_eq!(Endpoint::search("", &params), "/anime?q=&page=2");
    }

    #[test]
    fn test_search_encodes_values_in_order() {
        let params = SearchParams::new()
            .with("type", "tv")
            .with("sfw", true)
            .with("min_score", 7.5)
            .with("genres", json!([1, 4]))
            .with("start_date", "2020-01-01");

        assert_eq!(
            Endpoint::search("fullmetal alchemist", &params),
            "/anime?q=fullmetal%20alchemist&type=tv&sfw=true&min_score=7.5&genres=1%2C4&start_date=2020-01-01"
        );
    }

    #[test]
    fn test_params_replace_existing_name() {
        let mut params = SearchParams::new().with("page", 1);
        params.insert("page", 3);
        assert_eq!(params.rendered(), vec![("page", "3".to_string())]);
    }
}
