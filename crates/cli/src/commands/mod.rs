//! CLI command implementations.

use std::sync::Arc;

use nouie_cart::{CartConfig, CartStore, ConfigError, FileStore, KeyValueStore, LocalOrderLog, StorageError};
use thiserror::Error;

pub mod cart;
pub mod checkout;
pub mod orders;

/// Errors that can occur while setting up a command.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot open data directory: {0}")]
    Storage(#[from] StorageError),
}

/// Cart and order log opened over the configured data directory.
pub struct Context {
    pub cart: CartStore,
    pub orders: LocalOrderLog,
}

impl Context {
    /// Open the store described by environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the data directory
    /// cannot be created.
    pub fn from_env() -> Result<Self, ContextError> {
        let config = CartConfig::from_env()?;
        Self::open(&config)
    }

    /// Open the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(config: &CartConfig) -> Result<Self, ContextError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir)?);
        tracing::debug!(dir = %config.data_dir.display(), "Opened data directory");

        Ok(Self {
            cart: CartStore::with_key(Arc::clone(&storage), config.cart_key.clone()),
            orders: LocalOrderLog::with_key(storage, config.orders_key.clone()),
        })
    }
}
