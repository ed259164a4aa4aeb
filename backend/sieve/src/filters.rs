//! # Filter State Machine
//!
//! The browse filters: one state value, one pure reducer, one matching predicate.
//!
//! ## Cascades
//! - Setting `city` always clears `neighborhood` and `cuisineType`
//! - Setting a non-empty `neighborhood` keeps only the cuisine selections still offered
//!   for the current city and the new neighborhoods
//! - Setting a non-empty `cuisineType` does the same for neighborhood selections
//! - Clearing `neighborhood` or `cuisineType` touches nothing else
//! - `name`, `reservationNeeded` and `priceRange` never cascade
//!
//! Invalidated selections are dropped silently. [`FilterEngine::set_filter`] reports
//! them so a caller can warn about them.
//!
//! ## Matching
//! A group is kept when at least one of its recommendations matches every active
//! dimension. Results are ordered by each group's alphabetically first cuisine.
use serde::{Deserialize, Serialize};

use crate::{
    city::normalize_city,
    cuisine::first_alphabetical_cuisine,
    dedup::are_similar,
    facets::{Facets, cuisine_types, neighborhoods},
    grouper::group,
    models::{Dimension, RestaurantGroup, RestaurantRecord},
    tokens::split_tokens,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub name: String,
    pub city: Vec<String>,
    pub neighborhood: Vec<String>,
    pub cuisine_type: Vec<String>,
    pub reservation_needed: String,
    pub price_range: Vec<String>,
}

impl FilterState {
    pub fn is_active(&self) -> bool {
        !self.name.is_empty()
            || !self.city.is_empty()
            || !self.neighborhood.is_empty()
            || !self.cuisine_type.is_empty()
            || !self.reservation_needed.is_empty()
            || !self.price_range.is_empty()
    }

    /// Copy of a caller-supplied state with canonical cities and trimmed, unique selections.
    pub fn sanitized(&self) -> FilterState {
        FilterState {
            name: self.name.clone(),
            city: canonical_cities(&self.city),
            neighborhood: clean_selection(&self.neighborhood),
            cuisine_type: clean_selection(&self.cuisine_type),
            reservation_needed: self.reservation_needed.trim().to_string(),
            price_range: clean_selection(&self.price_range),
        }
    }
}

/// A raw selection as it arrives from a caller: one value or many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Name(String),
    City(Vec<String>),
    Neighborhood(Vec<String>),
    CuisineType(Vec<String>),
    ReservationNeeded(String),
    PriceRange(Vec<String>),
}

impl FilterValue {
    pub fn new(dimension: Dimension, selection: Selection) -> Self {
        let many = || match &selection {
            Selection::One(value) => vec![value.clone()],
            Selection::Many(values) => values.clone(),
        };
        let one = || match &selection {
            Selection::One(value) => value.clone(),
            Selection::Many(values) => values.first().cloned().unwrap_or_default(),
        };

        match dimension {
            Dimension::Name => FilterValue::Name(one()),
            Dimension::City => FilterValue::City(many()),
            Dimension::Neighborhood => FilterValue::Neighborhood(many()),
            Dimension::CuisineType => FilterValue::CuisineType(many()),
            Dimension::ReservationNeeded => FilterValue::ReservationNeeded(one()),
            Dimension::PriceRange => FilterValue::PriceRange(many()),
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            FilterValue::Name(_) => Dimension::Name,
            FilterValue::City(_) => Dimension::City,
            FilterValue::Neighborhood(_) => Dimension::Neighborhood,
            FilterValue::CuisineType(_) => Dimension::CuisineType,
            FilterValue::ReservationNeeded(_) => Dimension::ReservationNeeded,
            FilterValue::PriceRange(_) => Dimension::PriceRange,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    Set(FilterValue),
    Reset,
}

pub fn reduce(groups: &[RestaurantGroup], state: &FilterState, action: FilterAction) -> FilterState {
    let value = match action {
        FilterAction::Reset => return FilterState::default(),
        FilterAction::Set(value) => value,
    };

    let mut next = state.clone();

    match value {
        FilterValue::Name(name) => next.name = name,
        FilterValue::City(cities) => {
            next.city = canonical_cities(&cities);
            next.neighborhood.clear();
            next.cuisine_type.clear();
        }
        FilterValue::Neighborhood(selected) => {
            next.neighborhood = clean_selection(&selected);
            if !next.neighborhood.is_empty() {
                let valid = cuisine_types(groups, &next);
                next.cuisine_type.retain(|cuisine| still_offered(&valid, cuisine));
            }
        }
        FilterValue::CuisineType(selected) => {
            next.cuisine_type = clean_selection(&selected);
            if !next.cuisine_type.is_empty() {
                let valid = neighborhoods(groups, &next);
                next.neighborhood.retain(|neighborhood| still_offered(&valid, neighborhood));
            }
        }
        FilterValue::ReservationNeeded(reservation) => {
            next.reservation_needed = reservation.trim().to_string();
        }
        FilterValue::PriceRange(prices) => next.price_range = clean_selection(&prices),
    }

    next
}

pub fn matches_name(record: &RestaurantRecord, name: &str) -> bool {
    name.is_empty() || record.name == name
}

pub fn matches_city(record: &RestaurantRecord, cities: &[String]) -> bool {
    cities.is_empty() || cities.contains(&normalize_city(&record.city))
}

/// True when the field has a token equal (ignoring case) or similar to any selection.
pub fn matches_tokens(field: &str, selected: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }

    let tokens = split_tokens(field);
    selected.iter().any(|wanted| {
        tokens
            .iter()
            .any(|token| wanted.eq_ignore_ascii_case(token) || are_similar(wanted, token))
    })
}

pub fn matches_reservation(record: &RestaurantRecord, reservation: &str) -> bool {
    reservation.is_empty() || record.reservation_needed == reservation
}

pub fn matches_price(record: &RestaurantRecord, prices: &[String]) -> bool {
    prices.is_empty() || prices.contains(&record.price_range)
}

pub fn matches(record: &RestaurantRecord, state: &FilterState) -> bool {
    matches_name(record, &state.name)
        && matches_city(record, &state.city)
        && matches_tokens(&record.neighborhood, &state.neighborhood)
        && matches_tokens(&record.cuisine_type, &state.cuisine_type)
        && matches_reservation(record, &state.reservation_needed)
        && matches_price(record, &state.price_range)
}

pub fn apply_filters(groups: &[RestaurantGroup], state: &FilterState) -> Vec<RestaurantGroup> {
    let mut filtered: Vec<RestaurantGroup> = groups
        .iter()
        .filter(|group| group.recommendations.iter().any(|record| matches(record, state)))
        .cloned()
        .collect();

    filtered.sort_by_cached_key(|group| first_alphabetical_cuisine(group).to_lowercase());
    filtered
}

/// Outcome of one `set_filter` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cascade {
    pub state: FilterState,
    pub dropped_neighborhoods: Vec<String>,
    pub dropped_cuisine_types: Vec<String>,
}

/// Holds the grouped restaurants and the current filter state.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    groups: Vec<RestaurantGroup>,
    state: FilterState,
}

impl FilterEngine {
    pub fn new(records: &[RestaurantRecord]) -> Self {
        Self::from_groups(group(records))
    }

    pub fn from_groups(groups: Vec<RestaurantGroup>) -> Self {
        Self {
            groups,
            state: FilterState::default(),
        }
    }

    /// Starts from a caller-held state instead of the default one.
    pub fn with_state(mut self, state: &FilterState) -> Self {
        self.state = state.sanitized();
        self
    }

    /// Replaces the record set wholesale. The current selections are kept.
    pub fn load(&mut self, records: &[RestaurantRecord]) {
        self.groups = group(records);
    }

    pub fn groups(&self) -> &[RestaurantGroup] {
        &self.groups
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn dispatch(&mut self, action: FilterAction) -> Cascade {
        let set = match &action {
            FilterAction::Set(value) => Some(value.dimension()),
            FilterAction::Reset => None,
        };

        let previous = std::mem::take(&mut self.state);
        self.state = reduce(&self.groups, &previous, action);

        // a reset or the user's own replacement is not an invalidation
        let dropped = |dimension: Dimension, before: &[String], after: &[String]| -> Vec<String> {
            if set.is_none() || set == Some(dimension) {
                return Vec::new();
            }
            before
                .iter()
                .filter(|value| !after.contains(value))
                .cloned()
                .collect()
        };

        Cascade {
            dropped_neighborhoods: dropped(
                Dimension::Neighborhood,
                &previous.neighborhood,
                &self.state.neighborhood,
            ),
            dropped_cuisine_types: dropped(
                Dimension::CuisineType,
                &previous.cuisine_type,
                &self.state.cuisine_type,
            ),
            state: self.state.clone(),
        }
    }

    pub fn set_filter(&mut self, value: FilterValue) -> Cascade {
        self.dispatch(FilterAction::Set(value))
    }

    pub fn reset(&mut self) {
        self.dispatch(FilterAction::Reset);
    }

    pub fn filtered(&self) -> Vec<RestaurantGroup> {
        apply_filters(&self.groups, &self.state)
    }

    pub fn facets(&self) -> Facets {
        Facets::compute(&self.groups, &self.state)
    }
}

fn canonical_cities(cities: &[String]) -> Vec<String> {
    let normalized: Vec<String> = cities.iter().map(|city| normalize_city(city)).collect();
    clean_selection(&normalized)
}

fn clean_selection(values: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !cleaned.iter().any(|seen| seen == value) {
            cleaned.push(value.to_string());
        }
    }
    cleaned
}

/// A selection survives a cascade when some offered option is the same token or a
/// near-duplicate of it, since the representative spelling can change with the subset.
fn still_offered(options: &[String], value: &str) -> bool {
    options
        .iter()
        .any(|option| option.eq_ignore_ascii_case(value) || are_similar(option, value))
}
