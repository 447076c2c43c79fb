//! # Service Container
//!
//! Constructs every client the account service needs exactly once and
//! keeps them alive for the life of the process.
//!
//! ## Initialization Order
//!
//! ```text
//! 1. Key-value store (RocksDB or in-memory)
//! 2. User repository over the store
//! 3. Signature verifier (TD-01)
//! 4. Event bus and the approval queue adapter publishing to it
//! 5. Twitter OAuth client settings
//! 6. User account service (TD-02)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use shared_bus::InMemoryEventBus;
use td_02_user_accounts::{
    AccountServiceConfig, AccountServiceDependencies, BusEventAdapter, KVStoreError,
    KeyValueStore, KvUserRepository, SignatureVerifier, UserAccountApi, UserAccountService,
    UserRepository,
};

use crate::adapters::{
    InMemoryKVStore, MeteredAccounts, MeteredPublisher, MeteredRepository, SignatureAdapter,
    TwitterOAuthClient,
};
#[cfg(feature = "rocksdb")]
use crate::adapters::RocksDbStore;
use crate::container::config::AppConfig;

/// Startup failures.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The key-value store could not be opened.
    #[error("failed to open user store: {0}")]
    Storage(#[from] KVStoreError),
}

/// Central container holding all process-lifetime clients.
pub struct ServiceContainer {
    /// Account operations, metered.
    pub accounts: Arc<dyn UserAccountApi>,

    /// User repository shared with the service.
    pub repository: Arc<dyn UserRepository>,

    /// Signer recovery.
    pub verifier: Arc<dyn SignatureVerifier>,

    /// Event bus carrying approvals to the handler.
    pub event_bus: Arc<InMemoryEventBus>,

    /// Twitter OAuth client. `None` when credentials are not configured.
    pub twitter: Option<Arc<TwitterOAuthClient>>,

    /// Runtime configuration (immutable after initialization).
    pub config: AppConfig,
}

impl ServiceContainer {
    /// Build the container, choosing the store from configuration.
    ///
    /// With the `rocksdb` feature and `TD_DATA_DIR` set, users persist in
    /// RocksDB; otherwise they live in memory.
    #[instrument(name = "container_init", skip(config))]
    pub fn new(config: AppConfig) -> Result<Self, ContainerError> {
        match config.storage.data_dir.clone() {
            Some(dir) => Self::with_data_dir(config, dir),
            None => {
                info!("Using in-memory user store");
                Ok(Self::with_store(config, InMemoryKVStore::new()))
            }
        }
    }

    #[cfg(feature = "rocksdb")]
    fn with_data_dir(config: AppConfig, dir: PathBuf) -> Result<Self, ContainerError> {
        info!(data_dir = %dir.display(), "Opening RocksDB user store");
        let store = RocksDbStore::open_default(&dir)?;
        Ok(Self::with_store(config, store))
    }

    #[cfg(not(feature = "rocksdb"))]
    fn with_data_dir(config: AppConfig, dir: PathBuf) -> Result<Self, ContainerError> {
        warn!(
            data_dir = %dir.display(),
            "TD_DATA_DIR set but built without the rocksdb feature; using in-memory store"
        );
        Ok(Self::with_store(config, InMemoryKVStore::new()))
    }

    /// Build the container over an explicit store.
    pub fn with_store<KV>(config: AppConfig, store: KV) -> Self
    where
        KV: KeyValueStore + 'static,
    {
        info!(environment = %config.environment, "Initializing account service container");

        let repository: Arc<dyn UserRepository> = Arc::new(MeteredRepository::new(Arc::new(
            KvUserRepository::new(store),
        )));

        let verifier: Arc<dyn SignatureVerifier> = Arc::new(SignatureAdapter::new());

        let event_bus = Arc::new(InMemoryEventBus::with_capacity(config.bus_capacity));
        let bus_adapter = Arc::new(BusEventAdapter::new(Arc::new(MeteredPublisher::new(
            Arc::clone(&event_bus),
        ))));

        let twitter = TwitterOAuthClient::from_config(&config).map(Arc::new);
        if twitter.is_none() {
            warn!("Twitter OAuth credentials not configured");
        }

        let service = UserAccountService::with_config(
            AccountServiceDependencies {
                repository: Arc::clone(&repository),
                verifier: Arc::clone(&verifier),
                approvals: bus_adapter.clone(),
                notifier: Some(bus_adapter),
            },
            AccountServiceConfig {
                login_challenge: config.login_challenge.clone(),
            },
        );
        let accounts: Arc<dyn UserAccountApi> = Arc::new(MeteredAccounts::new(Arc::new(service)));

        info!(
            bus_capacity = event_bus.capacity(),
            "Account service container ready"
        );

        Self {
            accounts,
            repository,
            verifier,
            event_bus,
            twitter,
            config,
        }
    }
}
