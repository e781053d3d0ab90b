//! Shopping cart state.
//!
//! [`CartStore`] is the single source of truth for the in-progress order. It
//! is constructed once at startup and handed to every collaborator that needs
//! it (cart badge, cart drawer, checkout). Clones share the same cart.
//!
//! # Persistence
//!
//! The full line list is written as a JSON array under one storage key after
//! every mutation. Persistence is best effort:
//!
//! - load failures (absent key, storage error, malformed JSON) start an empty
//!   cart
//! - save failures are logged and dropped; the in-memory mutation stands
//!
//! # Notification
//!
//! Listeners receive a [`CartEvent`] synchronously after each mutation, once
//! the item lock has been released. A listener may read the store from inside
//! its callback.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nouie_core::{CartItem, ProductId};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::listeners::{Listeners, Subscription};
use crate::storage::KeyValueStore;

/// Storage key the storefront has always used for the cart.
pub const DEFAULT_CART_KEY: &str = "nouie_cart";

/// Change delivered to cart listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line was appended at `index`.
    ItemAdded { index: usize },
    /// The existing line at `index` now has quantity `qty`.
    QuantityIncremented { index: usize, qty: u32 },
    /// The line previously at `index` was removed.
    ItemRemoved { index: usize },
    /// All lines were removed.
    Cleared,
}

/// Shared handle to the shopping cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    key: String,
    storage: Arc<dyn KeyValueStore>,
    items: Mutex<Vec<CartItem>>,
    listeners: Listeners<CartEvent>,
}

impl CartStore {
    /// Open the cart stored under [`DEFAULT_CART_KEY`].
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(storage, DEFAULT_CART_KEY)
    }

    /// Open the cart stored under `key`, loading any saved lines.
    #[must_use]
    pub fn with_key(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = load(storage.as_ref(), &key);
        debug!(key = %key, lines = items.len(), "Cart loaded");

        Self {
            inner: Arc::new(CartStoreInner {
                key,
                storage,
                items: Mutex::new(items),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Storage key this cart persists under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    /// Snapshot of the current lines in display order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.lock_items().clone()
    }

    /// Sum of `price * qty` over all lines.
    ///
    /// Saturates at [`Decimal::MAX`] (or [`Decimal::MIN`]) rather than
    /// overflowing, since prices are not validated on add.
    #[must_use]
    pub fn total(&self) -> Decimal {
        CartItem::total_of(&self.lock_items())
    }

    /// Sum of `qty` over all lines, saturating at [`u32::MAX`].
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        CartItem::quantity_of(&self.lock_items())
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_items().len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_items().is_empty()
    }

    /// Add one unit of `(id, size)`.
    ///
    /// An existing line for the same product and size has its quantity
    /// incremented and keeps the name and price it was created with.
    /// Otherwise a new line with quantity 1 is appended. Inputs are not
    /// validated.
    pub fn add_item(
        &self,
        id: impl Into<ProductId>,
        name: impl Into<String>,
        size: impl Into<String>,
        price: Decimal,
    ) {
        let id = id.into();
        let size = size.into();

        self.mutate(|items| {
            let existing = items
                .iter_mut()
                .enumerate()
                .find(|(_, item)| item.matches(&id, &size));

            let event = if let Some((index, line)) = existing {
                line.qty = line.qty.saturating_add(1);
                CartEvent::QuantityIncremented {
                    index,
                    qty: line.qty,
                }
            } else {
                items.push(CartItem::new(id, name, size, price));
                CartEvent::ItemAdded {
                    index: items.len() - 1,
                }
            };
            Some((event, ()))
        });
    }

    /// Remove the line at `index` and return it.
    ///
    /// Out-of-range indices leave the cart untouched: nothing is persisted,
    /// no listener runs, and `None` is returned.
    pub fn remove_item(&self, index: usize) -> Option<CartItem> {
        let removed = self.mutate(|items| {
            if index >= items.len() {
                return None;
            }
            Some((CartEvent::ItemRemoved { index }, items.remove(index)))
        });

        if removed.is_none() {
            debug!(index, "Ignoring out-of-range cart removal");
        }
        removed
    }

    /// Remove every line.
    pub fn clear(&self) {
        self.mutate(|items| {
            items.clear();
            Some((CartEvent::Cleared, ()))
        });
    }

    /// Register a listener called after every mutation.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartEvent) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(listener)
    }

    /// Apply `change` under the item lock, persist, then notify.
    ///
    /// `change` returns `None` when it left the items untouched.
    fn mutate<R>(
        &self,
        change: impl FnOnce(&mut Vec<CartItem>) -> Option<(CartEvent, R)>,
    ) -> Option<R> {
        let (event, output) = {
            let mut items = self.lock_items();
            let (event, output) = change(&mut items)?;
            self.persist(&items);
            (event, output)
        };

        self.inner.listeners.emit(&event);
        Some(output)
    }

    fn persist(&self, items: &[CartItem]) {
        let key = &self.inner.key;

        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.inner.storage.set(key, &json) {
            warn!(key = %key, error = %e, "Failed to save cart");
        }
    }

    fn lock_items(&self) -> MutexGuard<'_, Vec<CartItem>> {
        self.inner
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("items", &*self.lock_items())
            .field("listeners", &self.inner.listeners)
            .finish_non_exhaustive()
    }
}

/// Read saved lines, falling back to an empty cart on any failure.
fn load(storage: &dyn KeyValueStore, key: &str) -> Vec<CartItem> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to load cart");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartItem>>(&raw) {
        Ok(mut items) => {
            let before = items.len();
            items.retain(|item| item.qty > 0);
            if items.len() != before {
                warn!(key = %key, dropped = before - items.len(), "Dropped zero-quantity cart lines");
            }
            items
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to parse saved cart");
            Vec::new()
        }
    }
}
