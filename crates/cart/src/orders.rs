//! Local order log.
//!
//! Orders that could not reach the remote order store are appended here, and
//! the admin panel lists them and moves them through [`OrderStatus`] values.
//! The log is a JSON array of [`Order`] under one storage key.

use std::sync::Arc;

use nouie_core::{Order, OrderId, OrderStatus};
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::{KeyValueStore, StorageError};

/// Storage key the storefront has always used for locally saved orders.
pub const DEFAULT_ORDERS_KEY: &str = "nouie_orders";

/// Errors from order log writes.
#[derive(Debug, Error)]
pub enum OrderLogError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The saved log could not be parsed; it is left untouched.
    #[error("saved order log is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to serialize order log: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Orders persisted in the local key-value store.
#[derive(Clone)]
pub struct LocalOrderLog {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl LocalOrderLog {
    /// Open the log stored under [`DEFAULT_ORDERS_KEY`].
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(storage, DEFAULT_ORDERS_KEY)
    }

    /// Open the log stored under `key`.
    #[must_use]
    pub fn with_key(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// All saved orders, oldest first.
    ///
    /// An absent, unreadable, or malformed log reads as empty.
    #[must_use]
    pub fn list(&self) -> Vec<Order> {
        self.read().unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "Failed to read order log");
            Vec::new()
        })
    }

    /// Look up a saved order by ID.
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<Order> {
        self.list().into_iter().find(|order| order.id == Some(id))
    }

    /// Append `order` to the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing log cannot be read or parsed, or the
    /// updated log cannot be written. A corrupt log is never overwritten.
    pub fn append(&self, order: Order) -> Result<(), OrderLogError> {
        let mut orders = self.read()?;
        let id = order.id;
        orders.push(order);
        self.write(&orders)?;

        info!(key = %self.key, order_id = ?id, "Order saved locally");
        Ok(())
    }

    /// Set the status of the order with `id`.
    ///
    /// Returns `false` if no saved order has that ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read, parsed, or written.
    pub fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<bool, OrderLogError> {
        let mut orders = self.read()?;

        let Some(order) = orders.iter_mut().find(|order| order.id == Some(id)) else {
            return Ok(false);
        };
        order.status = status;
        self.write(&orders)?;

        info!(order_id = %id, status = %status, "Order status updated");
        Ok(true)
    }

    fn read(&self) -> Result<Vec<Order>, OrderLogError> {
        match self.storage.get(&self.key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(OrderLogError::Corrupt),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, orders: &[Order]) -> Result<(), OrderLogError> {
        let json = serde_json::to_string(orders).map_err(OrderLogError::Serialize)?;
        self.storage.set(&self.key, &json)?;
        Ok(())
    }
}

impl std::fmt::Debug for LocalOrderLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalOrderLog")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
