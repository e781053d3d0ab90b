//! NO UIE Cart - Cart state, checkout, and local order log.
//!
//! # Architecture
//!
//! ```text
//! CartStore ──persist──▶ KeyValueStore ◀──append── LocalOrderLog
//!     │                                                 ▲
//!     └──items/total/clear── Checkout ──fallback────────┘
//!                               │
//!                               └──submit──▶ OrderGateway (remote)
//! ```
//!
//! The [`CartStore`] is an explicit context object: construct it once at
//! startup and pass clones to whatever needs the cart. All operations run to
//! completion synchronously.
//!
//! # Modules
//!
//! - [`store`] - The cart and its change events
//! - [`listeners`] - Typed listener registry with idempotent unsubscribe
//! - [`storage`] - Key-value surfaces (memory, file)
//! - [`orders`] - Local order log used as checkout fallback and by the admin panel
//! - [`checkout`] - Order submission
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod config;
pub mod listeners;
pub mod orders;
pub mod storage;
pub mod store;

pub use checkout::{
    Checkout, CheckoutError, CheckoutForm, CheckoutOutcome, FormError, GatewayError,
    OfflineGateway, OrderGateway, OrderReference,
};
pub use config::{CartConfig, ConfigError};
pub use listeners::{Listeners, Subscription};
pub use orders::{LocalOrderLog, OrderLogError};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartEvent, CartStore};
