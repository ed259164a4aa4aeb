//! # Bank
//!
//! Where restaurant records live between runs, and the other small stores the
//! browser needs (support inbox, address cache).
//!
//! ## Load order
//! [`load_with_fallback`] tries, in order:
//! - the stored snapshot of the last admin upload
//! - the sample spreadsheet export on disk
//! - the built-in [`sample`] restaurants
//!
//! Each step that fails or comes back empty is logged and skipped.
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sieve::{RestaurantRecord, city::normalize_city};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

pub mod address;
pub mod remote;
pub mod sample;
pub mod sheet;
pub mod support;

pub const DATA_FILE: &str = "restaurant-data.json";

#[derive(Error, Debug)]
pub enum BankError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote source answered with status {0}")]
    RemoteStatus(String),

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("No support message with id {0}")]
    MessageNotFound(String),
}

/// The stored upload: every record plus when it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub restaurants: Vec<RestaurantRecord>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub count: usize,
}

impl Snapshot {
    pub fn new(restaurants: Vec<RestaurantRecord>) -> Self {
        Self {
            count: restaurants.len(),
            restaurants,
            updated_at: Utc::now(),
        }
    }
}

pub trait Repository: Send + Sync {
    /// The last saved snapshot, `None` when nothing was ever saved.
    fn snapshot(&self) -> Result<Option<Snapshot>, BankError>;

    /// Replaces the stored records wholesale.
    fn save(&self, restaurants: &[RestaurantRecord]) -> Result<Snapshot, BankError>;

    fn load(&self) -> Result<Vec<RestaurantRecord>, BankError> {
        Ok(self
            .snapshot()?
            .map(|snapshot| snapshot.restaurants)
            .unwrap_or_default())
    }
}

pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(DATA_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Repository for JsonFileRepository {
    fn snapshot(&self) -> Result<Option<Snapshot>, BankError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = fs::read(&self.path)?;
        Ok(Some(serde_json::from_slice(&data)?))
    }

    fn save(&self, restaurants: &[RestaurantRecord]) -> Result<Snapshot, BankError> {
        let snapshot = Snapshot::new(restaurants.to_vec());

        write_atomic(&self.path, &serde_json::to_vec_pretty(&snapshot)?)?;
        info!("Stored {} restaurants in {}", snapshot.count, self.path.display());

        Ok(snapshot)
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    snapshot: Mutex<Option<Snapshot>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryRepository {
    fn snapshot(&self) -> Result<Option<Snapshot>, BankError> {
        Ok(self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, restaurants: &[RestaurantRecord]) -> Result<Snapshot, BankError> {
        let snapshot = Snapshot::new(restaurants.to_vec());
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());

        Ok(snapshot)
    }
}

/// Writes a uniquely named file next to the target, then renames it over the target.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BankError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Store,
    Csv,
    Sample,
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub restaurants: Vec<RestaurantRecord>,
    pub source: DataSource,
}

/// Stored records, else the CSV at `csv_path`, else the built-in sample.
///
/// Stored records get their city re-normalized and an id from their position
/// when they have none.
pub fn load_with_fallback(repository: &dyn Repository, csv_path: &Path) -> Loaded {
    match repository.load() {
        Ok(restaurants) if !restaurants.is_empty() => {
            info!("Loaded {} restaurants from the store", restaurants.len());
            return Loaded {
                restaurants: renormalize(restaurants),
                source: DataSource::Store,
            };
        }
        Ok(_) => info!("Store is empty, trying {}", csv_path.display()),
        Err(e) => warn!("Failed to read the store: {e}"),
    }

    match sheet::parse_csv_file(csv_path) {
        Ok(restaurants) if !restaurants.is_empty() => {
            info!("Loaded {} restaurants from {}", restaurants.len(), csv_path.display());
            return Loaded {
                restaurants,
                source: DataSource::Csv,
            };
        }
        Ok(_) => info!("{} has no restaurants", csv_path.display()),
        Err(e) => warn!("Failed to read {}: {e}", csv_path.display()),
    }

    info!("Falling back to sample restaurants");
    Loaded {
        restaurants: sample::restaurants(),
        source: DataSource::Sample,
    }
}

pub fn renormalize(restaurants: Vec<RestaurantRecord>) -> Vec<RestaurantRecord> {
    restaurants
        .into_iter()
        .enumerate()
        .map(|(index, mut record)| {
            record.city = normalize_city(&record.city);
            if record.id.is_none() {
                record.id = Some(index.to_string());
            }
            record
        })
        .collect()
}
