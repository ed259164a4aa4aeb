use std::sync::Arc;

use bank::{
    BankError, JsonFileRepository, Loaded, Repository, address::AddressCache,
    load_with_fallback, support::SupportInbox,
};
use reqwest::Client;
use tokio::{sync::Mutex, task};

use super::{config::Config, error::AppError};

pub struct AppState {
    pub config: Config,
    pub repository: Box<dyn Repository>,
    pub inbox: Mutex<SupportInbox>,
    pub address_cache: Mutex<AddressCache>,
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>, BankError> {
        let repository = Box::new(JsonFileRepository::new(&config.data_dir));
        let inbox = SupportInbox::open(&config.data_dir)?;
        let address_cache = AddressCache::open(&config.data_dir);

        Ok(Arc::new(Self {
            repository,
            inbox: Mutex::new(inbox),
            address_cache: Mutex::new(address_cache),
            http: Client::new(),
            config,
        }))
    }

    /// The records to browse: the stored upload, else the sample export, else built-ins.
    pub fn restaurants(&self) -> Loaded {
        load_with_fallback(self.repository.as_ref(), &self.config.sample_csv)
    }

    /// Runs file-bound work on the blocking pool instead of a runtime worker.
    pub async fn blocking<T, F>(self: &Arc<Self>, work: F) -> Result<T, AppError>
    where
        F: FnOnce(&AppState) -> T + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);

        task::spawn_blocking(move || work(&state))
            .await
            .map_err(|e| AppError::Internal(Box::new(e)))
    }
}
