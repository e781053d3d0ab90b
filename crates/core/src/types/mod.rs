//! Core types for the NO UIE store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart_item;
pub mod id;
pub mod order;
pub mod price;
pub mod status;

pub use cart_item::CartItem;
pub use id::{OrderId, ProductId};
pub use order::Order;
pub use price::{CurrencyCode, Price};
pub use status::{OrderStatus, OrderStatusError};
