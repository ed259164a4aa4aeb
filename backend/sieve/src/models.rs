use std::{fmt, str::FromStr};

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
};
use thiserror::Error;

/// The four reservation answers offered by the submission form, in display order.
pub const RESERVATION_OPTIONS: [&str; 4] = [
    "Walk-in only/no reservations",
    "Just pull up!",
    "Not required, but recommended",
    "Yes, required",
];

/// One recommendation submission.
///
/// Every field defaults to an empty string so rows coming from a spreadsheet or an
/// older upload never fail to load. Non-string JSON values are read as empty too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestaurantRecord {
    #[serde(deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub website: String,
    #[serde(deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(deserialize_with = "lenient_string")]
    pub neighborhood: String,
    #[serde(deserialize_with = "lenient_string")]
    pub cuisine_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub what_you_love: String,
    #[serde(deserialize_with = "lenient_string")]
    pub must_have: String,
    #[serde(deserialize_with = "lenient_string")]
    pub reservation_needed: String,
    #[serde(deserialize_with = "lenient_string")]
    pub planning_timeframe: String,
    #[serde(deserialize_with = "lenient_string")]
    pub price_range: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
}

impl RestaurantRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// All recommendations for one restaurant, keyed by its normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantGroup {
    pub id: String,
    pub name: String,
    pub recommendations: Vec<RestaurantRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Name,
    City,
    Neighborhood,
    CuisineType,
    ReservationNeeded,
    PriceRange,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Name,
        Dimension::City,
        Dimension::Neighborhood,
        Dimension::CuisineType,
        Dimension::ReservationNeeded,
        Dimension::PriceRange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Name => "name",
            Dimension::City => "city",
            Dimension::Neighborhood => "neighborhood",
            Dimension::CuisineType => "cuisineType",
            Dimension::ReservationNeeded => "reservationNeeded",
            Dimension::PriceRange => "priceRange",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown filter dimension: {0}")]
pub struct UnknownDimension(pub String);

impl FromStr for Dimension {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|dimension| dimension.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDimension(s.to_string()))
    }
}

/// Reads any JSON scalar as an optional string. Strings pass through, numbers are
/// rendered, and everything else (null, booleans, arrays, objects) reads as absent.
struct LenientString;

impl<'de> Visitor<'de> for LenientString {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or scalar value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(LenientString)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserializer.deserialize_any(LenientString)?.unwrap_or_default())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientString)
}
