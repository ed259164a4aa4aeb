//! # City Normalization
//!
//! Collapses free-text city entries into the canonical names used as city facets.
//!
//! ## Rules, in precedence order
//! 1. Trim and collapse whitespace runs
//! 2. Anything containing "san francisco", or exactly "sf", is `San Francisco`
//! 3. Anything containing "new york", or exactly "nyc", is `New York City`
//! 4. "Multiple locations" entries lose their parenthesized segments and their
//!    `, multiple location(s)...` suffix
//! 5. A trailing `, XX` state code is dropped
//!
//! Rules 2 and 3 short-circuit everything after them. Every other city keeps its
//! original casing and is only cleaned up, never fuzzy-matched against other cities.
use std::sync::LazyLock;

use regex::Regex;

pub const SAN_FRANCISCO: &str = "San Francisco";
pub const NEW_YORK_CITY: &str = "New York City";

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static PARENTHESIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("valid regex"));

static MULTIPLE_LOCATIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i),\s*multiple\s+locations?.*").expect("valid regex"));

static STATE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*[A-Za-z]{2}\s*$").expect("valid regex"));

pub fn normalize_city(input: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(input.trim(), " ").into_owned();
    let lower = collapsed.to_lowercase();

    if lower.contains("san francisco") || lower == "sf" {
        return SAN_FRANCISCO.to_string();
    }

    if lower.contains("new york") || lower == "nyc" {
        return NEW_YORK_CITY.to_string();
    }

    let mut city = collapsed;

    if lower.contains("multiple location") {
        city = PARENTHESIZED_RE.replace_all(&city, "").trim().to_string();
        city = MULTIPLE_LOCATIONS_RE.replace_all(&city, "").trim().to_string();
    }

    STATE_CODE_RE.replace(&city, "").trim().to_string()
}

pub fn has_multiple_locations(city: &str) -> bool {
    city.to_lowercase().contains("multiple locations")
}

#[cfg(test)]
mod tests {
    use super::{has_multiple_locations, normalize_city};

    #[test]
    fn test_san_francisco_aliases() {
        assert_eq!(normalize_city("San Francisco, CA"), "San Francisco");
        assert_eq!(normalize_city("SF"), "San Francisco");
        assert_eq!(normalize_city("sf"), "San Francisco");
        assert_eq!(normalize_city("san   francisco"), "San Francisco");
        assert_eq!(
            normalize_city("San Francisco (multiple locations)"),
            "San Francisco"
        );
        assert_eq!(normalize_city("South San Francisco"), "San Francisco");
    }

    #[test]
    fn test_new_york_aliases() {
        assert_eq!(normalize_city("  NYC  "), "New York City");
        assert_eq!(normalize_city("New York"), "New York City");
        assert_eq!(normalize_city("new york, ny"), "New York City");
    }

    #[test]
    fn test_alias_must_be_exact() {
        assert_eq!(normalize_city("SFO"), "SFO");
        assert_eq!(normalize_city("NYC area"), "NYC area");
    }

    #[test]
    fn test_state_code_stripped() {
        assert_eq!(normalize_city("Reno, NV"), "Reno");
        assert_eq!(normalize_city("Oakland,ca "), "Oakland");
        assert_eq!(normalize_city("Austin, Texas"), "Austin, Texas");
    }

    #[test]
    fn test_multiple_locations() {
        assert_eq!(normalize_city("Oakland (Multiple Locations)"), "Oakland");
        assert_eq!(normalize_city("Berkeley, multiple locations"), "Berkeley");
        assert_eq!(normalize_city("Reno, NV (multiple locations)"), "Reno");
    }

    #[test]
    fn test_whitespace_and_casing() {
        assert_eq!(normalize_city("  Los    Angeles "), "Los Angeles");
        assert_eq!(normalize_city("oakland"), "oakland");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(normalize_city(""), "");
        assert_eq!(normalize_city("    "), "");
    }

    #[test]
    fn test_has_multiple_locations() {
        assert!(has_multiple_locations("Oakland (Multiple Locations)"));
        assert!(!has_multiple_locations("Oakland (multiple location)"));
        assert!(!has_multiple_locations("Oakland"));
    }
}
