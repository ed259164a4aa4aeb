//! # Facets
//!
//! The options offered for each filter dimension, derived from the restaurants and
//! the other active selections. Nothing here is cached; every call recomputes.
//!
//! ## Constraints per dimension
//! - `cities`: none, every canonical city in the data
//! - `names`, `reservation_options`: active cities
//! - `neighborhoods`: active cities and cuisine selections
//! - `cuisine_types`: active cities and neighborhood selections
//! - `price_ranges`: active cities, cuisine and neighborhood selections
//!
//! Neighborhood and cuisine options each read the other's current selection once;
//! there is no iteration to a fixed point.
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    city::normalize_city,
    dedup::deduplicate,
    filters::{FilterState, matches_city, matches_tokens},
    models::{RESERVATION_OPTIONS, RestaurantGroup, RestaurantRecord},
    tokens::split_tokens,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub cities: Vec<String>,
    pub names: Vec<String>,
    pub neighborhoods: Vec<String>,
    pub cuisine_types: Vec<String>,
    pub reservation_options: Vec<String>,
    pub price_ranges: Vec<String>,
}

impl Facets {
    pub fn compute(groups: &[RestaurantGroup], state: &FilterState) -> Self {
        Self {
            cities: cities(groups),
            names: restaurant_names(groups, state),
            neighborhoods: neighborhoods(groups, state),
            cuisine_types: cuisine_types(groups, state),
            reservation_options: reservation_options(groups, state),
            price_ranges: price_ranges(groups, state),
        }
    }
}

fn records(groups: &[RestaurantGroup]) -> impl Iterator<Item = &RestaurantRecord> {
    groups.iter().flat_map(|group| group.recommendations.iter())
}

/// Records in the active cities. Records whose city normalizes to nothing never
/// pass an active city constraint.
fn in_cities<'a>(
    groups: &'a [RestaurantGroup],
    state: &'a FilterState,
) -> impl Iterator<Item = &'a RestaurantRecord> {
    records(groups).filter(|record| matches_city(record, &state.city))
}

pub fn cities(groups: &[RestaurantGroup]) -> Vec<String> {
    records(groups)
        .map(|record| normalize_city(&record.city))
        .filter(|city| !city.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn restaurant_names(groups: &[RestaurantGroup], state: &FilterState) -> Vec<String> {
    let mut names: Vec<String> = groups
        .iter()
        .filter(|group| {
            group
                .recommendations
                .iter()
                .any(|record| matches_city(record, &state.city))
        })
        .map(|group| group.name.clone())
        .collect();
    names.sort();
    names
}

pub fn neighborhoods(groups: &[RestaurantGroup], state: &FilterState) -> Vec<String> {
    let tokens = in_cities(groups, state)
        .filter(|record| matches_tokens(&record.cuisine_type, &state.cuisine_type))
        .flat_map(|record| split_tokens(&record.neighborhood));

    deduplicate(tokens)
}

pub fn cuisine_types(groups: &[RestaurantGroup], state: &FilterState) -> Vec<String> {
    let tokens = in_cities(groups, state)
        .filter(|record| matches_tokens(&record.neighborhood, &state.neighborhood))
        .flat_map(|record| split_tokens(&record.cuisine_type));

    deduplicate(tokens)
}

/// The canonical reservation phrases present in the active cities, in their fixed
/// order. Without a city selection all four are offered.
pub fn reservation_options(groups: &[RestaurantGroup], state: &FilterState) -> Vec<String> {
    if state.city.is_empty() {
        return RESERVATION_OPTIONS.iter().map(|option| option.to_string()).collect();
    }

    let present: BTreeSet<&str> = in_cities(groups, state)
        .map(|record| record.reservation_needed.as_str())
        .filter(|reservation| !reservation.is_empty())
        .collect();

    RESERVATION_OPTIONS
        .iter()
        .filter(|option| present.contains(*option))
        .map(|option| option.to_string())
        .collect()
}

/// Price values present after the city, cuisine and neighborhood constraints,
/// ordered by their number of `$`.
pub fn price_ranges(groups: &[RestaurantGroup], state: &FilterState) -> Vec<String> {
    let mut prices: Vec<String> = in_cities(groups, state)
        .filter(|record| matches_tokens(&record.cuisine_type, &state.cuisine_type))
        .filter(|record| matches_tokens(&record.neighborhood, &state.neighborhood))
        .map(|record| record.price_range.clone())
        .filter(|price| !price.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    prices.sort_by_key(|price| price.matches('$').count());
    prices
}

/// Canonical city to the sorted raw tokens of one field across that city's records.
fn city_token_map<F>(groups: &[RestaurantGroup], field: F) -> BTreeMap<String, Vec<String>>
where
    F: Fn(&RestaurantRecord) -> &str,
{
    let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for record in records(groups) {
        let city = normalize_city(&record.city);
        if city.is_empty() {
            continue;
        }
        map.entry(city).or_default().extend(split_tokens(field(record)));
    }

    map.into_iter()
        .map(|(city, tokens)| (city, tokens.into_iter().collect()))
        .collect()
}

pub fn city_neighborhood_map(groups: &[RestaurantGroup]) -> BTreeMap<String, Vec<String>> {
    city_token_map(groups, |record| record.neighborhood.as_str())
}

pub fn city_cuisine_map(groups: &[RestaurantGroup]) -> BTreeMap<String, Vec<String>> {
    city_token_map(groups, |record| record.cuisine_type.as_str())
}

#[cfg(test)]
mod tests {
    use super::{
        Facets, cities, city_cuisine_map, city_neighborhood_map, cuisine_types, neighborhoods, price_ranges,
        reservation_options, restaurant_names,
    };
    use crate::{
        filters::FilterState,
        grouper::group,
        models::{RESERVATION_OPTIONS, RestaurantGroup, RestaurantRecord},
    };

    fn record(
        name: &str,
        city: &str,
        neighborhood: &str,
        cuisine: &str,
        price: &str,
        reservation: &str,
    ) -> RestaurantRecord {
        RestaurantRecord {
            city: city.to_string(),
            neighborhood: neighborhood.to_string(),
            cuisine_type: cuisine.to_string(),
            price_range: price.to_string(),
            reservation_needed: reservation.to_string(),
            ..RestaurantRecord::named(name)
        }
    }

    fn fixture() -> Vec<RestaurantGroup> {
        group(&[
            record("Mumbai Masala", "Oakland", "Temescal", "Indian", "$$", "Just pull up!"),
            record("Taco Loco", "Oakland, CA", "Fruitvale", "Mexican", "$", "Just pull up!"),
            record("Golden Dragon", "SF", "Chinatown", "Chinese", "$$", "Walk-in only/no reservations"),
            record("Olive & Thyme", "San Francisco, CA", "Mission", "Mediterranean", "$$$", "Yes, required"),
            record("Pasta Bar", "San Francisco", "The Mission/Marina", "Italian", "$$$$", ""),
            record("Pasta Place", "San Francisco", "Marina", "Itallian", "$$", ""),
            record("Nameless City", "", "Nowhere", "Diner", "", ""),
        ])
    }

    fn with_city(city: &str) -> FilterState {
        FilterState {
            city: vec![city.to_string()],
            ..FilterState::default()
        }
    }

    #[test]
    fn test_cities_canonical_unique_sorted() {
        assert_eq!(cities(&fixture()), vec!["Oakland", "San Francisco"]);
    }

    #[test]
    fn test_neighborhoods_by_city() {
        assert_eq!(neighborhoods(&fixture(), &with_city("Oakland")), vec!["Fruitvale", "Temescal"]);
    }

    #[test]
    fn test_neighborhoods_constrained_by_cuisine() {
        let state = FilterState {
            cuisine_type: vec!["Italian".to_string()],
            ..with_city("San Francisco")
        };

        assert_eq!(neighborhoods(&fixture(), &state), vec!["Marina", "The Mission"]);
    }

    #[test]
    fn test_cuisines_deduplicated_and_constrained() {
        let state = with_city("San Francisco");
        assert_eq!(
            cuisine_types(&fixture(), &state),
            vec!["Chinese", "Italian", "Mediterranean"]
        );

        let state = FilterState {
            neighborhood: vec!["Marina".to_string()],
            ..with_city("San Francisco")
        };
        assert_eq!(cuisine_types(&fixture(), &state), vec!["Italian"]);
    }

    #[test]
    fn test_no_city_means_all_records() {
        let all = neighborhoods(&fixture(), &FilterState::default());

        assert!(all.contains(&"Nowhere".to_string()));
        assert!(all.contains(&"Temescal".to_string()));
    }

    #[test]
    fn test_price_ranges_ordered_by_dollars() {
        assert_eq!(
            price_ranges(&fixture(), &FilterState::default()),
            vec!["$", "$$", "$$$", "$$$$"]
        );

        let state = FilterState {
            neighborhood: vec!["Marina".to_string()],
            ..with_city("San Francisco")
        };
        assert_eq!(price_ranges(&fixture(), &state), vec!["$$", "$$$$"]);
    }

    #[test]
    fn test_reservation_options() {
        let groups = fixture();

        assert_eq!(reservation_options(&groups, &FilterState::default()), RESERVATION_OPTIONS.to_vec());
        assert_eq!(reservation_options(&groups, &with_city("Oakland")), vec!["Just pull up!"]);
        assert_eq!(
            reservation_options(&groups, &with_city("San Francisco")),
            vec!["Walk-in only/no reservations", "Yes, required"]
        );
    }

    #[test]
    fn test_restaurant_names_by_city() {
        assert_eq!(
            restaurant_names(&fixture(), &with_city("Oakland")),
            vec!["Mumbai Masala", "Taco Loco"]
        );
        assert_eq!(restaurant_names(&fixture(), &FilterState::default()).len(), 7);
    }

    #[test]
    fn test_city_neighborhood_map() {
        let map = city_neighborhood_map(&fixture());

        assert_eq!(map.len(), 2);
        assert_eq!(map["Oakland"], vec!["Fruitvale", "Temescal"]);
        assert_eq!(map["San Francisco"], vec!["Chinatown", "Marina", "Mission", "The Mission"]);
    }

    #[test]
    fn test_city_cuisine_map_keeps_raw_tokens() {
        let map = city_cuisine_map(&fixture());

        assert_eq!(map.len(), 2);
        assert_eq!(map["Oakland"], vec!["Indian", "Mexican"]);
        assert_eq!(
            map["San Francisco"],
            vec!["Chinese", "Italian", "Itallian", "Mediterranean"]
        );
    }

    #[test]
    fn test_compute_all() {
        let facets = Facets::compute(&fixture(), &with_city("Oakland"));

        assert_eq!(facets.cities, vec!["Oakland", "San Francisco"]);
        assert_eq!(facets.cuisine_types, vec!["Indian", "Mexican"]);
        assert_eq!(facets.price_ranges, vec!["$", "$$"]);
    }
}
