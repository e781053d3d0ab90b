//! Checkout command.
//!
//! No remote order store is wired into the CLI, so every order is written to
//! the local order log.

use nouie_cart::{Checkout, CheckoutError, CheckoutForm, CheckoutOutcome, OfflineGateway};
use nouie_core::Price;

use super::Context;

/// Place an order for the current cart and print the confirmation.
///
/// # Errors
///
/// Returns an error if the cart is empty, the form is invalid, or the order
/// cannot be saved.
pub fn place_order(ctx: &Context, form: CheckoutForm) -> Result<CheckoutOutcome, CheckoutError> {
    let total = ctx.cart.total();
    let outcome = Checkout::new(&ctx.cart, &OfflineGateway, &ctx.orders).submit(form)?;

    let saved = match &outcome {
        CheckoutOutcome::Submitted { .. } => String::new(),
        CheckoutOutcome::SavedLocally { id, .. } => format!(" (saved locally as order {id})"),
    };

    #[allow(clippy::print_stdout)]
    {
        println!("ORDER CONFIRMED");
        println!("ORDER REF: {}{saved}", outcome.reference());
        println!("TOTAL {}", Price::usd(total));
    }

    Ok(outcome)
}
