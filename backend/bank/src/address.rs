//! # Address Cache
//!
//! Remembers the outcome of every place lookup so a restaurant is only looked up once.
//!
//! ## Persistence
//! - Entries live in memory and are mirrored to a JSON file when one is configured
//! - A file that cannot be read or written leaves the cache working in memory only
//! - Inserting under an existing key replaces the entry
//!
//! Only `found` and `not_found` outcomes are worth caching; a missing key or a failed
//! request should be retried next time.
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{BankError, write_atomic};

pub const ADDRESS_CACHE_FILE: &str = "address-cache.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    Found,
    NotFound,
    Error,
    NoApiKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressEntry {
    pub status: LookupStatus,
    pub address: Option<String>,
    #[serde(default)]
    pub location_count: u32,
    pub place_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub looked_up_at: Option<DateTime<Utc>>,
}

impl AddressEntry {
    fn empty(status: LookupStatus) -> Self {
        Self {
            status,
            address: None,
            location_count: 0,
            place_id: None,
            note: None,
            price_range: None,
            error: None,
            looked_up_at: None,
        }
    }

    pub fn not_found() -> Self {
        Self::empty(LookupStatus::NotFound)
    }

    pub fn no_api_key() -> Self {
        Self::empty(LookupStatus::NoApiKey)
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(LookupStatus::Error)
        }
    }

    fn found(place: &Place, location_count: u32) -> Self {
        Self {
            address: Some(place.formatted_address.clone()),
            location_count,
            place_id: Some(place.place_id.clone()),
            price_range: place
                .price_level
                .and_then(price_level_to_range)
                .map(str::to_string),
            ..Self::empty(LookupStatus::Found)
        }
    }

    pub fn is_cacheable(&self) -> bool {
        matches!(self.status, LookupStatus::Found | LookupStatus::NotFound)
    }
}

/// One candidate from a places text search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Place {
    pub name: String,
    pub formatted_address: String,
    pub place_id: String,
    pub price_level: Option<u8>,
}

/// Maps a places price level (0 free to 4 very expensive) onto the `$` scale.
pub fn price_level_to_range(level: u8) -> Option<&'static str> {
    match level {
        0 | 1 => Some("$"),
        2 => Some("$$"),
        3 => Some("$$$"),
        4 => Some("$$$$"),
        _ => None,
    }
}

/// Picks the address for `name` out of the search candidates.
///
/// With several candidates, the ones whose name contains (or is contained in) the
/// restaurant name win. Several such matches are treated as a chain and counted.
pub fn resolve(name: &str, places: &[Place]) -> AddressEntry {
    let Some(first) = places.first() else {
        return AddressEntry::not_found();
    };

    if places.len() == 1 {
        return AddressEntry::found(first, 1);
    }

    let wanted = name.to_lowercase();
    let matching: Vec<&Place> = places
        .iter()
        .filter(|place| {
            let candidate = place.name.to_lowercase();
            candidate.contains(&wanted) || wanted.contains(&candidate)
        })
        .collect();

    match matching.as_slice() {
        [] => AddressEntry::found(first, 1),
        [only] => AddressEntry::found(only, 1),
        [best, ..] => {
            let count = u32::try_from(matching.len()).unwrap_or(u32::MAX);
            AddressEntry {
                note: Some(format!("{count} locations found, showing first match")),
                ..AddressEntry::found(best, count)
            }
        }
    }
}

pub fn cache_key(name: &str, city: &str, neighborhood: &str) -> String {
    format!("{name}|{city}|{neighborhood}").to_lowercase().trim().to_string()
}

#[derive(Debug, Default)]
pub struct AddressCache {
    entries: BTreeMap<String, AddressEntry>,
    path: Option<PathBuf>,
}

impl AddressCache {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the cache file in `data_dir`, creating an empty one when absent.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let path = data_dir.as_ref().join(ADDRESS_CACHE_FILE);

        if path.exists() {
            let loaded = fs::read(&path)
                .map_err(|e| e.to_string())
                .and_then(|data| serde_json::from_slice(&data).map_err(|e| e.to_string()));

            return match loaded {
                Ok(entries) => {
                    let cache = Self {
                        entries,
                        path: Some(path),
                    };
                    info!("Loaded {} cached addresses", cache.len());
                    cache
                }
                Err(e) => {
                    warn!("Failed to read {}: {e}, starting empty", path.display());
                    Self {
                        entries: BTreeMap::new(),
                        path: Some(path),
                    }
                }
            };
        }

        match write_atomic(&path, b"{}") {
            Ok(()) => {
                info!("Created address cache at {}", path.display());
                Self {
                    entries: BTreeMap::new(),
                    path: Some(path),
                }
            }
            Err(e) => {
                warn!("Could not create {}: {e}, caching in memory only", path.display());
                Self::in_memory()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&AddressEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, entry: AddressEntry) {
        self.entries.insert(key, entry);
        self.persist();
    }

    pub fn entries(&self) -> &BTreeMap<String, AddressEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let written = serde_json::to_vec_pretty(&self.entries)
            .map_err(BankError::from)
            .and_then(|bytes| write_atomic(path, &bytes));

        if let Err(e) = written {
            warn!("Could not save address cache, keeping it in memory: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{
        ADDRESS_CACHE_FILE, AddressCache, AddressEntry, LookupStatus, Place, cache_key,
        price_level_to_range, resolve,
    };

    fn place(name: &str, address: &str) -> Place {
        Place {
            name: name.to_string(),
            formatted_address: address.to_string(),
            place_id: format!("id-{address}"),
            price_level: None,
        }
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key(" Zuni Cafe", "San Francisco", ""), "zuni cafe|san francisco|");
        assert_eq!(cache_key("A", "B", "C "), "a|b|c");
    }

    #[test]
    fn test_price_levels() {
        assert_eq!(price_level_to_range(0), Some("$"));
        assert_eq!(price_level_to_range(1), Some("$"));
        assert_eq!(price_level_to_range(4), Some("$$$$"));
        assert_eq!(price_level_to_range(5), None);
    }

    #[test]
    fn test_resolve_none_or_one() {
        assert_eq!(resolve("Zuni", &[]).status, LookupStatus::NotFound);

        let entry = resolve("Zuni", &[Place { price_level: Some(3), ..place("Other", "1 Main") }]);
        assert_eq!(entry.status, LookupStatus::Found);
        assert_eq!(entry.address.as_deref(), Some("1 Main"));
        assert_eq!(entry.price_range.as_deref(), Some("$$$"));
        assert_eq!(entry.location_count, 1);
    }

    #[test]
    fn test_resolve_prefers_name_match() {
        let places = [place("Corner Deli", "1 Main"), place("Zuni Cafe", "1658 Market")];
        let entry = resolve("zuni cafe", &places);

        assert_eq!(entry.address.as_deref(), Some("1658 Market"));
        assert_eq!(entry.location_count, 1);
        assert!(entry.note.is_none());
    }

    #[test]
    fn test_resolve_chain() {
        let places = [
            place("Tartine Bakery", "600 Guerrero"),
            place("Tartine Manufactory", "595 Alabama"),
            place("Other", "1 Main"),
        ];
        let entry = resolve("Tartine", &places);

        assert_eq!(entry.address.as_deref(), Some("600 Guerrero"));
        assert_eq!(entry.location_count, 2);
        assert_eq!(entry.note.as_deref(), Some("2 locations found, showing first match"));
    }

    #[test]
    fn test_resolve_no_name_match_uses_first() {
        let places = [place("A", "1 Main"), place("B", "2 Main")];

        assert_eq!(resolve("Zuni", &places).address.as_deref(), Some("1 Main"));
    }

    #[test]
    fn test_cacheable() {
        assert!(AddressEntry::not_found().is_cacheable());
        assert!(!AddressEntry::no_api_key().is_cacheable());
        assert!(!AddressEntry::failed("timeout").is_cacheable());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();

        let mut cache = AddressCache::open(dir.path());
        assert!(dir.path().join(ADDRESS_CACHE_FILE).exists());
        cache.insert(cache_key("Zuni", "SF", ""), resolve("Zuni", &[place("Zuni", "1 Main")]));
        cache.insert(cache_key("Zuni", "SF", ""), AddressEntry::not_found());

        let reopened = AddressCache::open(dir.path());
        assert_eq!(reopened.len(), 1);
        assert_eq!(
            reopened.get("zuni|sf|").map(|entry| entry.status),
            Some(LookupStatus::NotFound)
        );
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(ADDRESS_CACHE_FILE), "{ nope").unwrap();

        let mut cache = AddressCache::open(dir.path());
        assert!(cache.is_empty());

        cache.insert("k".to_string(), AddressEntry::not_found());
        assert_eq!(AddressCache::open(dir.path()).len(), 1);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(AddressEntry::no_api_key()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "no_api_key",
                "address": null,
                "locationCount": 0,
                "placeId": null
            })
        );
    }
}
