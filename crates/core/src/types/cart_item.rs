//! Cart line type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// One line in the shopping cart.
///
/// `name` and `price` are copied from the catalog when the line is created
/// and are not refreshed afterwards.
///
/// The serialized field names match the records the storefront has always
/// written to local storage. `price` is written as a decimal string and read
/// back from either a string or a JSON number.
///
/// ```
/// use nouie_core::{CartItem, ProductId};
/// use rust_decimal::Decimal;
///
/// let mut item = CartItem::new(ProductId::new("CAT01"), "Hoodie", "M", Decimal::new(100, 0));
/// item.qty += 1;
/// assert_eq!(item.line_total(), Decimal::new(200, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier.
    pub id: ProductId,
    /// Display name at add time.
    pub name: String,
    /// Selected size, free-form.
    pub size: String,
    /// Unit price at add time.
    pub price: Decimal,
    /// Quantity, at least 1.
    pub qty: u32,
}

impl CartItem {
    /// Create a new line with a quantity of one.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        size: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            size: size.into(),
            price,
            qty: 1,
        }
    }

    /// Whether this line holds the given product and size.
    #[must_use]
    pub fn matches(&self, id: &ProductId, size: &str) -> bool {
        self.id == *id && self.size == size
    }

    /// Unit price multiplied by quantity.
    ///
    /// Saturates at [`Decimal::MAX`] (or [`Decimal::MIN`] for a negative
    /// price) instead of overflowing.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price
            .checked_mul(Decimal::from(self.qty))
            .unwrap_or_else(|| saturated(self.price))
    }

    /// Sum of [`CartItem::line_total`] over `items`, saturating at
    /// [`Decimal::MAX`] / [`Decimal::MIN`].
    #[must_use]
    pub fn total_of(items: &[Self]) -> Decimal {
        items.iter().fold(Decimal::ZERO, |sum, item| {
            let line = item.line_total();
            sum.checked_add(line).unwrap_or_else(|| saturated(line))
        })
    }

    /// Sum of `qty` over `items`, saturating at [`u32::MAX`].
    #[must_use]
    pub fn quantity_of(items: &[Self]) -> u32 {
        items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.qty))
    }
}

/// Bound an overflowing result in the direction of `toward`.
fn saturated(toward: Decimal) -> Decimal {
    if toward.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}
