//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `NOUIE_DATA_DIR` - Directory for the file-backed store (default: `.nouie`)
//! - `NOUIE_CART_KEY` - Storage key for the cart (default: `nouie_cart`)
//! - `NOUIE_ORDERS_KEY` - Storage key for the local order log (default: `nouie_orders`)

use std::path::PathBuf;

use thiserror::Error;

use crate::orders::DEFAULT_ORDERS_KEY;
use crate::storage::validate_key;
use crate::store::DEFAULT_CART_KEY;

const DEFAULT_DATA_DIR: &str = ".nouie";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart and order log configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory holding the file-backed store
    pub data_dir: PathBuf,
    /// Storage key for the cart
    pub cart_key: String,
    /// Storage key for the local order log
    pub orders_key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cart_key: DEFAULT_CART_KEY.to_string(),
            orders_key: DEFAULT_ORDERS_KEY.to_string(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a storage key is not a valid key name.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a storage key is not a valid key name.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let data_dir = PathBuf::from(get("NOUIE_DATA_DIR", DEFAULT_DATA_DIR));
        let cart_key = get_key("NOUIE_CART_KEY", get("NOUIE_CART_KEY", DEFAULT_CART_KEY))?;
        let orders_key = get_key(
            "NOUIE_ORDERS_KEY",
            get("NOUIE_ORDERS_KEY", DEFAULT_ORDERS_KEY),
        )?;

        if cart_key == orders_key {
            return Err(ConfigError::InvalidEnvVar(
                "NOUIE_ORDERS_KEY".to_string(),
                "must differ from NOUIE_CART_KEY".to_string(),
            ));
        }

        Ok(Self {
            data_dir,
            cart_key,
            orders_key,
        })
    }
}

fn get_key(name: &str, value: String) -> Result<String, ConfigError> {
    validate_key(&value).map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))?;
    Ok(value)
}
