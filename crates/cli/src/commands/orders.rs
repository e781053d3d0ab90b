//! Local order log commands.

use nouie_cart::OrderLogError;
use nouie_core::{Order, OrderId, OrderStatus, Price};
use thiserror::Error;

use super::Context;

/// Errors from order commands.
#[derive(Debug, Error)]
pub enum OrdersCommandError {
    #[error("No local order with ID {0}")]
    NotFound(OrderId),

    #[error(transparent)]
    Log(#[from] OrderLogError),
}

/// Print every locally saved order.
pub fn list(ctx: &Context) {
    let orders = ctx.orders.list();

    #[allow(clippy::print_stdout)]
    {
        if orders.is_empty() {
            println!("No local orders");
        }
        for order in &orders {
            println!("{}", summary(order));
        }
    }
}

/// Set the status of a saved order.
///
/// # Errors
///
/// Returns an error if the order does not exist or the log cannot be updated.
pub fn set_status(ctx: &Context, id: OrderId, status: OrderStatus) -> Result<(), OrdersCommandError> {
    if !ctx.orders.update_status(id, status)? {
        return Err(OrdersCommandError::NotFound(id));
    }

    #[allow(clippy::print_stdout)]
    {
        println!("Order {id} is now {status}");
    }
    Ok(())
}

/// One-line order summary for listings.
fn summary(order: &Order) -> String {
    let id = order
        .id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    let placed = order
        .created_at
        .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());

    format!(
        "{id:<14} {placed:<16} {:<10} {:<24} {:>3} items  {}",
        order.status.as_str(),
        order.customer_name,
        order.total_quantity(),
        Price::usd(order.total)
    )
}
