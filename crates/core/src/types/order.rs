//! Submitted order record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CartItem, OrderId, OrderStatus};

/// An order built from the cart at checkout.
///
/// `id` and `created_at` are only set once the order is written to the local
/// order log; the remote store assigns its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<CartItem>,
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total number of units across all lines, saturating at [`u32::MAX`].
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        CartItem::quantity_of(&self.items)
    }
}
