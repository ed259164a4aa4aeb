//! # Sieve
//!
//! Normalization, near-duplicate detection and cascading filters for the restaurant
//! recommendation browser. Pure logic over in-memory records, no I/O.
//!
//! ## Pipeline
//! - Records arrive from the bank (upload, CSV or API) as [`RestaurantRecord`]s
//! - [`grouper::group`] folds recommendations of the same restaurant together
//! - [`facets::Facets`] derives the options for every filter dimension
//! - [`filters::FilterEngine`] holds the selections and applies them
//!
//! ## Text cleanup
//! Spreadsheet answers are inconsistent. Cities are canonicalized by rule
//! ([`city::normalize_city`]), while neighborhoods and cuisines are split on `,` and
//! `/` ([`tokens::split_tokens`]) and merged by edit distance
//! ([`dedup::deduplicate`]). Restaurant names are only ever matched exactly.
//!
//! ## Example
//! ```
//! use sieve::{FilterEngine, FilterValue, RestaurantRecord};
//!
//! let records = vec![
//!     RestaurantRecord {
//!         city: "Oakland, CA".to_string(),
//!         neighborhood: "Temescal".to_string(),
//!         cuisine_type: "Indian".to_string(),
//!         ..RestaurantRecord::named("Mumbai Masala")
//!     },
//!     RestaurantRecord {
//!         city: "SF".to_string(),
//!         neighborhood: "Mission".to_string(),
//!         cuisine_type: "Italian".to_string(),
//!         ..RestaurantRecord::named("The Italian Place")
//!     },
//! ];
//!
//! let mut engine = FilterEngine::new(&records);
//! engine.set_filter(FilterValue::City(vec!["Oakland".to_string()]));
//!
//! assert_eq!(engine.facets().neighborhoods, vec!["Temescal"]);
//! assert_eq!(engine.filtered().len(), 1);
//! ```
pub mod city;
pub mod cuisine;
pub mod dedup;
pub mod facets;
pub mod filters;
pub mod grouper;
pub mod models;
pub mod similarity;
pub mod tokens;

pub use facets::Facets;
pub use filters::{Cascade, FilterAction, FilterEngine, FilterState, FilterValue, Selection};
pub use models::{Dimension, RestaurantGroup, RestaurantRecord};
