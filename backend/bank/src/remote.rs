use reqwest::get;
use serde::Deserialize;
use sieve::RestaurantRecord;
use tracing::info;

use crate::{BankError, renormalize};

/// Body of a `GET /api/restaurants` answer from a running browser server.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Envelope {
    pub status: String,
    pub restaurants: Vec<RestaurantRecord>,
    pub updated_at: Option<String>,
    pub count: usize,
    pub source: String,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            status: "success".to_string(),
            restaurants: Vec::new(),
            updated_at: None,
            count: 0,
            source: String::new(),
        }
    }
}

impl Envelope {
    pub fn into_restaurants(self) -> Result<Vec<RestaurantRecord>, BankError> {
        if self.status != "success" {
            return Err(BankError::RemoteStatus(self.status));
        }

        Ok(renormalize(self.restaurants))
    }
}

pub async fn fetch_remote(url: &str) -> Result<Vec<RestaurantRecord>, BankError> {
    let envelope: Envelope = get(url).await?.error_for_status()?.json().await?;

    info!(
        "Fetched {} restaurants from {url} (source: {}, updated: {})",
        envelope.restaurants.len(),
        envelope.source,
        envelope.updated_at.as_deref().unwrap_or("never"),
    );

    envelope.into_restaurants()
}
