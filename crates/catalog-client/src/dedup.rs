//! Deduplication of search results by normalized title.
//!
//! Records whose titles differ only by punctuation, season suffix or medium
//! marker ("Season 2", "OVA", "Movie") are collapsed into one representative,
//! preferring entries that have not finished airing.

use shared::CatalogRecord;
use std::collections::HashMap;

/// Standalone tokens naming a release medium rather than a title
const MEDIUM_TOKENS: &[&str] = &["ova", "ona", "special", "movie", "tv"];

/// Normalize a title into its grouping key.
///
/// Lower-cases, drops punctuation, collapses whitespace, removes standalone
/// medium tokens and strips trailing season suffixes (`season 2`, `s 2`,
/// `season2`, `s2`). The result may be empty.
pub fn normalize_title(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| !MEDIUM_TOKENS.contains(t))
        .collect();

    loop {
        let suffix_len = match tokens.as_slice() {
            [.., marker, number] if is_season_marker(marker) && is_number(number) => 2,
            [.., last] if is_compact_season(last) => 1,
            _ => 0,
        };
        if suffix_len == 0 {
            break;
        }
        tokens.truncate(tokens.len() - suffix_len);
    }

    tokens.join(" ")
}

fn is_season_marker(token: &str) -> bool {
    token == "season" || token == "s"
}

fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// `season2` or `s2`
fn is_compact_season(token: &str) -> bool {
    token
        .strip_prefix("season")
        .or_else(|| token.strip_prefix('s'))
        .map(is_number)
        .unwrap_or(false)
}

/// Collapse records sharing a normalized title into one representative.
///
/// Within a group the record with the highest airing-status priority wins,
/// ties keeping the earliest record. Groups are emitted in order of first
/// appearance.
pub fn deduplicate(records: &[CatalogRecord]) -> Vec<CatalogRecord> {
    let mut order: Vec<usize> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for (idx, record) in records.iter().enumerate() {
        let key = normalize_title(record.display_title());

        match by_key.get(&key) {
            Some(&slot) => {
                let best = &records[order[slot]];
                if record.airing_status().priority() > best.airing_status().priority() {
                    order[slot] = idx;
                }
            }
            None => {
                by_key.insert(key, order.len());
                order.push(idx);
            }
        }
    }

    tracing::debug!(
        input = records.len(),
        output = order.len(),
        "Deduplicated records"
    );

    order.into_iter().map(|idx| records[idx].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(title: &str, english: Option<&str>, status: &str) -> CatalogRecord {
        let mut value = json!({ "title": title, "status": status });
        if let Some(english) = english {
            value["title_english"] = json!(english);
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_strips_season_suffix() {
        assert_eq!(normalize_title("Attack on Titan Season 2"), "attack on titan");
        assert_eq!(normalize_title("Attack on Titan"), "attack on titan");
        assert_eq!(normalize_title("Mob Psycho 100 S2"), "mob psycho 100");
        assert_eq!(normalize_title("Vinland Saga Season2"), "vinland saga");
        assert_eq!(normalize_title("Konosuba S 3"), "konosuba");
    }

    #[test]
    fn test_normalize_drops_punctuation_and_medium() {
        assert_eq!(normalize_title("Re:Zero  -  OVA"), "rezero");
        assert_eq!(normalize_title("Demon Slayer: Movie"), "demon slayer");
        assert_eq!(normalize_title("K-On! Special"), "kon");
        assert_eq!(normalize_title("Monogatari TV"), "monogatari");
    }

    #[test]
    fn test_normalize_keeps_embedded_words() {
        // Medium and season markers only count as standalone tokens
        assert_eq!(normalize_title("Tonari no Totoro"), "tonari no totoro");
        assert_eq!(normalize_title("Mobile Suit Gundam 00"), "mobile suit gundam 00");
        assert_eq!(normalize_title("Steins;Gate 0"), "steinsgate 0");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("!!!"), "");
        assert_eq!(normalize_title("Movie"), "");
    }

    #[test]
    fn test_groups_season_entries() {
        let input = vec![
            record("Shingeki no Kyojin Season 2", Some("Attack on Titan Season 2"), "Finished Airing"),
            record("Shingeki no Kyojin", Some("Attack on Titan"), "Finished Airing"),
        ];

        let output = deduplicate(&input);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0], input[0]);
    }

    #[test]
    fn test_priority_prefers_upcoming() {
        let input = vec![
            record("Title", None, "Finished Airing"),
            record("Title", None, "Currently Airing"),
            record("Title", None, "Not yet aired"),
        ];

        let output = deduplicate(&input);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].status(), Some("Not yet aired"));
    }

    #[test]
    fn test_ties_keep_first_record() {
        let input: Vec<CatalogRecord> = serde_json::from_value(json!([
            { "mal_id": 269, "title": "Bleach", "status": "Finished Airing" },
            { "mal_id": 1686, "title": "Bleach: Movie", "status": "Finished Airing" }
        ]))
        .unwrap();

        let output = deduplicate(&input);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].mal_id(), Some(269));
    }

    #[test]
    fn test_unknown_status_loses_to_known() {
        let input = vec![
            record("Naruto", None, "Hiatus"),
            record("Naruto", None, "Finished Airing"),
        ];

        let output = deduplicate(&input);
        assert_eq!(output[0].status(), Some("Finished Airing"));
    }

    #[test]
    fn test_group_order_follows_first_appearance() {
        let input = vec![
            record("One Piece", None, "Currently Airing"),
            record("Naruto", None, "Finished Airing"),
            record("One Piece Movie", None, "Finished Airing"),
            record("Bleach", None, "Finished Airing"),
            record("Naruto", None, "Not yet aired"),
        ];

        let titles: Vec<_> = deduplicate(&input)
            .into_iter()
            .map(|r| (r.title().unwrap().to_string(), r.status().unwrap().to_string()))
            .collect();

        assert_eq!(
            titles,
            vec![
                ("One Piece".to_string(), "Currently Airing".to_string()),
                ("Naruto".to_string(), "Not yet aired".to_string()),
                ("Bleach".to_string(), "Finished Airing".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_titles_share_empty_key() {
        let input = vec![
            CatalogRecord::default(),
            serde_json::from_value(json!({ "status": "Currently Airing" })).unwrap(),
        ];

        let output = deduplicate(&input);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].status(), Some("Currently Airing"));
    }

    #[test]
    fn test_deduplicate_is_idempotent() {
        let input = vec![
            record("Shingeki no Kyojin", Some("Attack on Titan"), "Finished Airing"),
            record("Shingeki no Kyojin: The Final Season", Some("Attack on Titan: Final Season"), "Finished Airing"),
            record("Shingeki no Kyojin Season 3", Some("Attack on Titan Season 3"), "Currently Airing"),
            record("Fullmetal Alchemist", None, "Finished Airing"),
            record("Fullmetal Alchemist: Brotherhood", None, "Finished Airing"),
            CatalogRecord::default(),
        ];

        let once = deduplicate(&input);
        let twice = deduplicate(&once);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 5);
    }

    #[test]
    fn test_empty_input() {
        assert!(deduplicate(&[]).is_empty());
    }
}
