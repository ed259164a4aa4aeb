//! # Address Lookup
//!
//! Resolves a restaurant to a street address with the Google Places text search,
//! going through the address cache first.
//!
//! ## Outcomes
//! - Cache hit: the stored entry, flagged `fromCache`
//! - No API key configured: `no_api_key`, nothing cached
//! - Request failure: `error` with the reason, nothing cached
//! - Otherwise `found` or `not_found`, stamped and cached
use bank::address::{AddressEntry, Place, cache_key, resolve};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::state::AppState;

const TEXT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lookup {
    #[serde(flatten)]
    pub entry: AddressEntry,
    pub from_cache: bool,
}

#[derive(Deserialize)]
struct TextSearch {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<Place>,
}

pub fn search_query(name: &str, city: &str, neighborhood: &str) -> String {
    if neighborhood.is_empty() {
        format!("{name} {city}")
    } else {
        format!("{name} {neighborhood} {city}")
    }
}

async fn text_search(http: &Client, api_key: &str, query: &str) -> Result<Vec<Place>, reqwest::Error> {
    let response: TextSearch = http
        .get(TEXT_SEARCH_URL)
        .query(&[("query", query), ("type", "restaurant"), ("key", api_key)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if response.status == "ZERO_RESULTS" {
        return Ok(Vec::new());
    }

    Ok(response.results)
}

pub async fn lookup_address(state: &AppState, name: &str, city: &str, neighborhood: &str) -> Lookup {
    let key = cache_key(name, city, neighborhood);

    if let Some(entry) = state.address_cache.lock().await.get(&key) {
        info!("Cache hit for: {name} in {city}");
        return Lookup {
            entry: entry.clone(),
            from_cache: true,
        };
    }

    info!("Cache miss for: {name} in {city}");

    let Some(api_key) = state.config.places_api_key.as_deref() else {
        warn!("No GOOGLE_PLACES_API_KEY configured");
        return Lookup {
            entry: AddressEntry::no_api_key(),
            from_cache: false,
        };
    };

    let query = search_query(name, city, neighborhood);
    let entry = match text_search(&state.http, api_key, &query).await {
        Ok(places) => AddressEntry {
            looked_up_at: Some(Utc::now()),
            ..resolve(name, &places)
        },
        Err(e) => {
            warn!("Address lookup for {name} failed: {e}");
            AddressEntry::failed(e.to_string())
        }
    };

    if entry.is_cacheable() {
        state.address_cache.lock().await.insert(key, entry.clone());
        info!("Cached address for: {name} in {city}");
    }

    Lookup {
        entry,
        from_cache: false,
    }
}

#[cfg(test)]
mod tests {
    use super::search_query;

    #[test]
    fn test_search_query() {
        assert_eq!(search_query("Zuni Cafe", "San Francisco", ""), "Zuni Cafe San Francisco");
        assert_eq!(
            search_query("Zuni Cafe", "San Francisco", "Hayes Valley"),
            "Zuni Cafe Hayes Valley San Francisco"
        );
    }
}
