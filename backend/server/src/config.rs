use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub sample_csv: PathBuf,
    pub admin_token: Option<String>,
    pub places_api_key: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("RUST_PORT", "3001")?,
            data_dir: try_load("DATA_DIR", "data")?,
            sample_csv: try_load("SAMPLE_CSV", "sample-restaurants.csv")?,
            admin_token: read_secret("ADMIN_UPLOAD_TOKEN"),
            places_api_key: read_secret("GOOGLE_PLACES_API_KEY"),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
            value,
        }
    })
}

/// Docker secret first, then the environment. Absent secrets disable their feature.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| var(secret_name).map(|s| s.trim().to_string()))
        .or_else(|| {
            info!("{secret_name} not provided, feature disabled");
            None
        })
}
