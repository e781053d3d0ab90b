//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! nouie cart add --id CAT01 --name Hoodie --size M --price 100
//! nouie cart show
//! nouie cart remove 0
//! nouie cart clear
//! ```

use std::fmt::Write as _;

use nouie_core::{CartItem, Price};
use rust_decimal::Decimal;
use thiserror::Error;

use super::Context;

/// Errors from cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("No cart line at position {index} (cart has {len} lines)")]
    NoSuchLine { index: usize, len: usize },
}

/// Print the cart.
pub fn show(ctx: &Context) {
    let rendered = render(&ctx.cart.items(), ctx.cart.total());

    #[allow(clippy::print_stdout)]
    {
        print!("{rendered}");
    }
}

/// Add one unit and print the new line count badge.
pub fn add(ctx: &Context, id: String, name: String, size: String, price: Decimal) {
    let subscription = ctx.cart.subscribe(|event| {
        tracing::info!(?event, "Cart updated");
    });
    ctx.cart.add_item(id, name, size, price);
    subscription.unsubscribe();

    #[allow(clippy::print_stdout)]
    {
        println!("CART ({})", ctx.cart.total_quantity());
    }
}

/// Remove the line at `index`.
///
/// # Errors
///
/// Returns an error if there is no line at `index`.
pub fn remove(ctx: &Context, index: usize) -> Result<(), CartCommandError> {
    let Some(item) = ctx.cart.remove_item(index) else {
        return Err(CartCommandError::NoSuchLine {
            index,
            len: ctx.cart.len(),
        });
    };

    #[allow(clippy::print_stdout)]
    {
        println!("Removed {} ({}) x{}", item.name, item.size, item.qty);
    }
    Ok(())
}

/// Empty the cart.
pub fn clear(ctx: &Context) {
    ctx.cart.clear();

    #[allow(clippy::print_stdout)]
    {
        println!("Cart cleared");
    }
}

/// Render cart lines and the total, one line per cart line.
pub fn render(items: &[CartItem], total: Decimal) -> String {
    if items.is_empty() {
        return "YOUR CART IS EMPTY\n".to_string();
    }

    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{index:>3}  {:<8} {:<24} SIZE: {:<4} x{:<3} {}",
            item.id,
            item.name,
            item.size,
            item.qty,
            Price::usd(item.line_total())
        );
    }
    let _ = writeln!(out, "TOTAL {}", Price::usd(total));
    out
}
