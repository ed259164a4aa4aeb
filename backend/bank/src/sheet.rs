//! Reading the recommendation spreadsheet export.
//!
//! The form's column titles drifted between versions ("City" vs "City:", "Price Range"
//! vs "Pricing Range"), so every field lists the titles it answers to. A title matches
//! exactly first, then ignoring case.
use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use sieve::{
    RestaurantRecord,
    city::{has_multiple_locations, normalize_city},
};

use crate::BankError;

const NAME: &[&str] = &["Restaurant Name", "Restaurant name"];
const WEBSITE: &[&str] = &["Website link", "Website Link"];
const CITY: &[&str] = &["City", "City:"];
const NEIGHBORHOOD: &[&str] = &["Neighborhood/Area:", "Neighborhood/Area"];
const CUISINE_TYPE: &[&str] = &["Cuisine type", "Cuisine Type"];
const WHAT_YOU_LOVE: &[&str] = &["What do you love about this place?"];
const MUST_HAVE: &[&str] = &[
    "What is/are your \"Must Have\" recommendation(s)?",
    "What are your \"Must Have\" recommendations\"?",
];
const RESERVATION_NEEDED: &[&str] = &["Reservation needed/required?"];
const PLANNING_TIMEFRAME: &[&str] = &["How far in advance do we need to plan?"];
const PRICE_RANGE: &[&str] = &["Price Range", "Pricing Range"];
const ADDRESS: &[&str] = &["Address", "address", "Location", "location"];

/// Column positions answering to one field, exact title matches first.
struct Column(Vec<usize>);

impl Column {
    fn find(headers: &StringRecord, titles: &[&str]) -> Self {
        let mut indices: Vec<usize> = titles
            .iter()
            .filter_map(|title| headers.iter().position(|header| header == *title))
            .collect();

        for title in titles {
            for (i, header) in headers.iter().enumerate() {
                if header.eq_ignore_ascii_case(title) && !indices.contains(&i) {
                    indices.push(i);
                }
            }
        }

        Self(indices)
    }

    fn value(&self, row: &StringRecord) -> String {
        self.0
            .iter()
            .filter_map(|&i| row.get(i))
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

/// One named row of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub record: RestaurantRecord,
    /// The city cell flagged the place as a chain before normalization dropped the note.
    pub multiple_locations: bool,
}

/// Parses a headed CSV export into records.
///
/// Values are trimmed, cities normalized, rows without a name dropped. Ids are the
/// row's position in the file, counting dropped rows.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RestaurantRecord>, BankError> {
    Ok(parse_rows(reader)?.into_iter().map(|row| row.record).collect())
}

/// Like [`parse_csv`], keeping what the raw city cell said about multiple locations.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<SheetRow>, BankError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let name = Column::find(&headers, NAME);
    let website = Column::find(&headers, WEBSITE);
    let city = Column::find(&headers, CITY);
    let neighborhood = Column::find(&headers, NEIGHBORHOOD);
    let cuisine_type = Column::find(&headers, CUISINE_TYPE);
    let what_you_love = Column::find(&headers, WHAT_YOU_LOVE);
    let must_have = Column::find(&headers, MUST_HAVE);
    let reservation_needed = Column::find(&headers, RESERVATION_NEEDED);
    let planning_timeframe = Column::find(&headers, PLANNING_TIMEFRAME);
    let price_range = Column::find(&headers, PRICE_RANGE);
    let address = Column::find(&headers, ADDRESS);

    let mut rows = Vec::new();

    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let raw_city = city.value(&row);

        let record = RestaurantRecord {
            id: Some(index.to_string()),
            name: name.value(&row),
            website: website.value(&row),
            city: normalize_city(&raw_city),
            neighborhood: neighborhood.value(&row),
            cuisine_type: cuisine_type.value(&row),
            what_you_love: what_you_love.value(&row),
            must_have: must_have.value(&row),
            reservation_needed: reservation_needed.value(&row),
            planning_timeframe: planning_timeframe.value(&row),
            price_range: price_range.value(&row),
            address: address.value(&row),
        };

        if !record.name.is_empty() {
            rows.push(SheetRow {
                record,
                multiple_locations: has_multiple_locations(&raw_city),
            });
        }
    }

    Ok(rows)
}

pub fn parse_csv_file(path: &Path) -> Result<Vec<RestaurantRecord>, BankError> {
    parse_csv(File::open(path)?)
}

pub fn parse_rows_file(path: &Path) -> Result<Vec<SheetRow>, BankError> {
    parse_rows(File::open(path)?)
}
