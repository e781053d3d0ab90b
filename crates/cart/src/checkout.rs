//! Checkout: turn the cart into an order.
//!
//! The order goes to the remote order store through an [`OrderGateway`]. If
//! the gateway fails, the order is appended to the [`LocalOrderLog`] instead.
//! Either way the customer gets an order reference and the cart is cleared.
//! The cart is only kept when the order could not be recorded anywhere.

use chrono::{DateTime, Utc};
use nouie_core::{Order, OrderId, OrderStatus};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::orders::{LocalOrderLog, OrderLogError};
use crate::store::CartStore;

// =============================================================================
// Form
// =============================================================================

/// Validation failures for a [`CheckoutForm`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

/// Shipping details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub notes: Option<String>,
}

impl CheckoutForm {
    /// Trim every field and check the required ones.
    ///
    /// Blank notes become `None`.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(self) -> Result<Self, FormError> {
        let customer_name = required("customer name", &self.customer_name)?;
        let customer_email = required("email", &self.customer_email)?;
        let customer_phone = required("phone", &self.customer_phone)?;
        let shipping_address = required("shipping address", &self.shipping_address)?;

        match customer_email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(FormError::InvalidEmail(customer_email)),
        }

        let notes = self
            .notes
            .map(|notes| notes.trim().to_owned())
            .filter(|notes| !notes.is_empty());

        Ok(Self {
            customer_name,
            customer_email,
            customer_phone,
            shipping_address,
            notes,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(value.to_owned())
}

// =============================================================================
// Remote order store
// =============================================================================

/// Failure reported by an [`OrderGateway`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The remote store could not be reached.
    #[error("order store unavailable: {0}")]
    Unavailable(String),

    /// The remote store refused the order.
    #[error("order rejected: {0}")]
    Rejected(String),
}

/// Remote order persistence.
pub trait OrderGateway {
    /// Record `order` remotely.
    ///
    /// # Errors
    ///
    /// Returns an error if the order was not recorded.
    fn submit_order(&self, order: &Order) -> Result<(), GatewayError>;
}

/// Gateway for running without a remote store. Every submission fails with
/// [`GatewayError::Unavailable`], so orders land in the local log.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGateway;

impl OrderGateway for OfflineGateway {
    fn submit_order(&self, _order: &Order) -> Result<(), GatewayError> {
        Err(GatewayError::Unavailable("no remote order store configured".to_string()))
    }
}

// =============================================================================
// Submission
// =============================================================================

/// Errors that stop a checkout. The cart is untouched in every case.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid checkout form: {0}")]
    InvalidForm(#[from] FormError),

    /// Remote submission failed and the local fallback failed too.
    #[error("order could not be saved: {0}")]
    Storage(#[from] OrderLogError),
}

/// Customer-facing order reference: the submission time in milliseconds,
/// rendered in uppercase base 36.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderReference(String);

impl OrderReference {
    /// Reference for an order placed at `at`.
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        let millis = u64::try_from(at.timestamp_millis()).unwrap_or(0);
        Self(to_base36(millis))
    }

    /// The reference text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        // n % 36 < 36
        #[allow(clippy::cast_possible_truncation)]
        let digit = (n % 36) as usize;
        out.push(DIGITS.get(digit).copied().unwrap_or(b'0'));
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// How a successful checkout was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Accepted by the remote order store.
    Submitted { reference: OrderReference },
    /// Remote store failed; saved to the local order log under `id`.
    SavedLocally {
        reference: OrderReference,
        id: OrderId,
    },
}

impl CheckoutOutcome {
    /// Reference shown to the customer.
    #[must_use]
    pub const fn reference(&self) -> &OrderReference {
        match self {
            Self::Submitted { reference } | Self::SavedLocally { reference, .. } => reference,
        }
    }
}

/// Checkout flow over a cart, a remote gateway, and the local fallback log.
pub struct Checkout<'a, G: OrderGateway + ?Sized> {
    cart: &'a CartStore,
    gateway: &'a G,
    log: &'a LocalOrderLog,
}

impl<'a, G: OrderGateway + ?Sized> Checkout<'a, G> {
    #[must_use]
    pub const fn new(cart: &'a CartStore, gateway: &'a G, log: &'a LocalOrderLog) -> Self {
        Self { cart, gateway, log }
    }

    /// Place an order for the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty, the form is invalid, or the
    /// order could be recorded neither remotely nor locally.
    pub fn submit(&self, form: CheckoutForm) -> Result<CheckoutOutcome, CheckoutError> {
        self.submit_at(form, Utc::now())
    }

    /// [`Checkout::submit`] with an explicit submission time.
    ///
    /// # Errors
    ///
    /// See [`Checkout::submit`].
    #[instrument(skip_all, fields(lines = self.cart.len()))]
    pub fn submit_at(
        &self,
        form: CheckoutForm,
        now: DateTime<Utc>,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let items = self.cart.items();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let form = form.validate()?;

        let mut order = Order {
            customer_name: form.customer_name,
            customer_email: form.customer_email,
            customer_phone: form.customer_phone,
            shipping_address: form.shipping_address,
            notes: form.notes,
            total: self.cart.total(),
            items,
            status: OrderStatus::Pending,
            id: None,
            created_at: None,
        };
        let reference = OrderReference::from_timestamp(now);

        let outcome = match self.gateway.submit_order(&order) {
            Ok(()) => {
                info!(reference = %reference, total = %order.total, "Order submitted");
                CheckoutOutcome::Submitted { reference }
            }
            Err(e) => {
                warn!(error = %e, "Order submission failed, saving locally");
                let id = OrderId::new(now.timestamp_millis());
                order.id = Some(id);
                order.created_at = Some(now);
                self.log.append(order)?;
                CheckoutOutcome::SavedLocally { reference, id }
            }
        };

        self.cart.clear();
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            customer_name: "  Ada Lovelace ".to_string(),
            customer_email: "ada@example.com".to_string(),
            customer_phone: "+1 555 0100".to_string(),
            shipping_address: "1 Main St, Springfield".to_string(),
            notes: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_validate_trims_and_drops_blank_notes() {
        let form = form().validate().unwrap();
        assert_eq!(form.customer_name, "Ada Lovelace");
        assert_eq!(form.notes, None);
    }

    #[test]
    fn test_validate_missing_field() {
        let mut bad = form();
        bad.customer_phone = " ".to_string();
        assert_eq!(bad.validate(), Err(FormError::MissingField("phone")));
    }

    #[test]
    fn test_validate_email() {
        for email in ["ada", "@example.com", "ada@"] {
            let mut bad = form();
            bad.customer_email = email.to_string();
            assert!(matches!(bad.validate(), Err(FormError::InvalidEmail(_))));
        }
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "LOYW3V28");
    }

    #[test]
    fn test_reference_from_timestamp() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        assert_eq!(OrderReference::from_timestamp(at).as_str(), "LOYW3V28");
    }
}
