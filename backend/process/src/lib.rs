//! # Restaurant Processing
//!
//! Offline side of the browser: getting recommendations into the store and checking
//! what the filters make of them.
//!
//! ## Import
//! 1. Parse the spreadsheet export (column titles matched loosely, cities normalized)
//! 2. Walk every record, counting restaurants and cities, plus the rows whose raw city
//!    cell said "multiple locations"
//! 3. Replace the stored upload wholesale
//!
//! ## Filters
//! Selections are applied in the order a visitor would pick them: city first, then
//! neighborhood and cuisine, then the rest. A selection the cascade drops is reported
//! instead of silently disappearing.
//!
//! ## Notes
//! - `fetch` pulls the store of another running server, useful to seed a local copy
//! - Build with `--features verbose` to print every record as it is imported
use std::{collections::BTreeSet, path::Path};

use anyhow::{Context, Result};
use bank::{
    JsonFileRepository, Loaded, Repository, load_with_fallback,
    remote::fetch_remote,
    sheet::{self, SheetRow},
};
use indicatif::{ProgressBar, ProgressStyle};
use sieve::{
    Facets, FilterEngine, FilterValue, RestaurantRecord,
    grouper::{group, normalize_name},
};
use tracing::{info, warn};

pub mod utils;

use utils::{format_facet, format_group};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub records: usize,
    pub restaurants: usize,
    pub cities: usize,
    pub multiple_locations: usize,
}

/// Every filter a command line can set at once.
#[derive(Debug, Clone, Default)]
pub struct Selections {
    pub city: Vec<String>,
    pub neighborhood: Vec<String>,
    pub cuisine_type: Vec<String>,
    pub name: Option<String>,
    pub reservation_needed: Option<String>,
    pub price_range: Vec<String>,
}

pub fn import_csv(csv_path: &Path, data_dir: &Path) -> Result<ImportSummary> {
    let rows = sheet::parse_rows_file(csv_path)
        .with_context(|| format!("Failed to parse {}", csv_path.display()))?;

    println!("Parsed Records: {}\n", rows.len());

    let summary = summarize(&rows)?;
    let records: Vec<RestaurantRecord> = rows.into_iter().map(|row| row.record).collect();

    JsonFileRepository::new(data_dir)
        .save(&records)
        .with_context(|| format!("Failed to store records in {}", data_dir.display()))?;

    println!("Stored Records: {}", summary.records);
    println!("Restaurants: {}", summary.restaurants);
    println!("Cities: {}", summary.cities);
    println!("Listed With Multiple Locations: {}", summary.multiple_locations);

    Ok(summary)
}

fn summarize(rows: &[SheetRow]) -> Result<ImportSummary> {
    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut restaurants = BTreeSet::new();
    let mut cities = BTreeSet::new();
    let mut multiple_locations = 0;

    for SheetRow {
        record,
        multiple_locations: chain,
    } in rows
    {
        pb.set_message(record.name.clone());

        if restaurants.insert(normalize_name(&record.name)) {
            #[cfg(feature = "verbose")]
            println!("New restaurant! {}", record.name);
        }

        if !record.city.is_empty() && cities.insert(record.city.clone()) {
            #[cfg(feature = "verbose")]
            println!("New city! {}", record.city);
        }

        if *chain {
            multiple_locations += 1;
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    Ok(ImportSummary {
        records: rows.len(),
        restaurants: restaurants.len(),
        cities: cities.len(),
        multiple_locations,
    })
}

pub fn load(data_dir: &Path, sample_csv: &Path) -> Loaded {
    let loaded = load_with_fallback(&JsonFileRepository::new(data_dir), sample_csv);
    info!("Using {} restaurants ({:?})", loaded.restaurants.len(), loaded.source);

    loaded
}

/// Applies the selections one dimension at a time, warning about cascaded drops.
pub fn engine(records: &[RestaurantRecord], selections: &Selections) -> FilterEngine {
    let mut engine = FilterEngine::new(records);

    let mut values = Vec::new();
    if !selections.city.is_empty() {
        values.push(FilterValue::City(selections.city.clone()));
    }
    if !selections.neighborhood.is_empty() {
        values.push(FilterValue::Neighborhood(selections.neighborhood.clone()));
    }
    if !selections.cuisine_type.is_empty() {
        values.push(FilterValue::CuisineType(selections.cuisine_type.clone()));
    }
    if let Some(name) = &selections.name {
        values.push(FilterValue::Name(name.clone()));
    }
    if let Some(reservation) = &selections.reservation_needed {
        values.push(FilterValue::ReservationNeeded(reservation.clone()));
    }
    if !selections.price_range.is_empty() {
        values.push(FilterValue::PriceRange(selections.price_range.clone()));
    }

    for value in values {
        let cascade = engine.set_filter(value);

        for neighborhood in &cascade.dropped_neighborhoods {
            warn!("Neighborhood {neighborhood} has no match for the selected cuisines, dropped");
        }
        for cuisine in &cascade.dropped_cuisine_types {
            warn!("Cuisine {cuisine} has no match in the selected neighborhoods, dropped");
        }
    }

    engine
}

pub fn facets_report(facets: &Facets) -> String {
    [
        format_facet("Cities", &facets.cities),
        format_facet("Neighborhoods", &facets.neighborhoods),
        format_facet("Cuisines", &facets.cuisine_types),
        format_facet("Reservations", &facets.reservation_options),
        format_facet("Prices", &facets.price_ranges),
        format_facet("Restaurants", &facets.names),
    ]
    .join("\n")
}

pub fn browse_report(engine: &FilterEngine) -> String {
    let filtered = engine.filtered();

    let mut lines: Vec<String> = filtered.iter().map(format_group).collect();
    lines.push(String::new());
    lines.push(format!(
        "{} of {} restaurants",
        filtered.len(),
        engine.groups().len()
    ));

    lines.join("\n")
}

pub async fn fetch_into(url: &str, data_dir: &Path) -> Result<usize> {
    let records = fetch_remote(url)
        .await
        .with_context(|| format!("Failed to fetch restaurants from {url}"))?;

    if records.is_empty() {
        println!("Remote store is empty, keeping local data.");
        return Ok(0);
    }

    let grouped = group(&records).len();
    JsonFileRepository::new(data_dir)
        .save(&records)
        .with_context(|| format!("Failed to store records in {}", data_dir.display()))?;

    println!("Fetched Records: {}", records.len());
    println!("Restaurants: {grouped}");

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use bank::{DataSource, JsonFileRepository, Repository};
    use sieve::RestaurantRecord;
    use tempfile::tempdir;

    use super::{Selections, browse_report, engine, facets_report, import_csv, load};

    const EXPORT: &str = "\
Restaurant Name,City,Neighborhood/Area,Cuisine Type,Address
Mumbai Masala,\"Oakland, CA\",Temescal,Indian,
Taco Loco,\"Oakland (Multiple Locations)\",Fruitvale,Mexican,
Taco Loco,Oakland,Fruitvale,Mexican,\"Multiple locations\"
The Italian Place,SF,Mission,Italian,
";

    fn record(name: &str, city: &str, neighborhood: &str, cuisine: &str) -> RestaurantRecord {
        RestaurantRecord {
            city: city.to_string(),
            neighborhood: neighborhood.to_string(),
            cuisine_type: cuisine.to_string(),
            ..RestaurantRecord::named(name)
        }
    }

    #[test]
    fn test_import_csv() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("export.csv");
        fs::write(&csv_path, EXPORT).unwrap();

        let summary = import_csv(&csv_path, dir.path()).unwrap();

        assert_eq!(summary.records, 4);
        assert_eq!(summary.restaurants, 3);
        assert_eq!(summary.cities, 2);
        assert_eq!(summary.multiple_locations, 1);
        assert_eq!(JsonFileRepository::new(dir.path()).load().unwrap().len(), 4);

        let loaded = load(dir.path(), &csv_path);
        assert_eq!(loaded.source, DataSource::Store);
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempdir().unwrap();

        assert!(import_csv(&dir.path().join("missing.csv"), dir.path()).is_err());
    }

    #[test]
    fn test_engine_applies_in_order() {
        let records = vec![
            record("Mumbai Masala", "Oakland", "Temescal", "Indian"),
            record("The Italian Place", "San Francisco", "Mission", "Italian"),
        ];
        let selections = Selections {
            city: vec!["SF".to_string()],
            neighborhood: vec!["Temescal".to_string()],
            cuisine_type: vec!["Italian".to_string()],
            ..Selections::default()
        };

        let engine = engine(&records, &selections);

        assert_eq!(engine.state().city, vec!["San Francisco"]);
        assert!(engine.state().neighborhood.is_empty());
        assert!(browse_report(&engine).starts_with("The Italian Place (Mission, San Francisco) [Italian]"));
        assert!(browse_report(&engine).ends_with("1 of 2 restaurants"));
    }

    #[test]
    fn test_facets_report() {
        let records = vec![record("Mumbai Masala", "Oakland", "Temescal", "Indian")];
        let report = facets_report(&engine(&records, &Selections::default()).facets());

        assert!(report.contains("Cities (1): Oakland"));
        assert!(report.contains("Neighborhoods (1): Temescal"));
        assert!(report.contains("Prices: (none)"));
    }
}
