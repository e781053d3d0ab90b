//! NO UIE CLI - Cart, checkout, and order tools.
//!
//! # Usage
//!
//! ```bash
//! # Add a hoodie in size M to the cart
//! nouie cart add --id CAT01 --name Hoodie --size M --price 100
//!
//! # Show the cart with totals
//! nouie cart show
//!
//! # Place the order (saved to the local order log)
//! nouie checkout --name "Ada Lovelace" --email ada@example.com \
//!     --phone "+1 555 0100" --address "1 Main St"
//!
//! # Move a local order along
//! nouie orders status 1700000000000 shipped
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the cart
//! - `checkout` - Turn the cart into an order
//! - `orders` - List local orders and update their status
//!
//! Data lives in `NOUIE_DATA_DIR` (default `.nouie`). Set `RUST_LOG` to
//! change log verbosity and `NOUIE_LOG_FORMAT=json` for JSON logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use nouie_core::{OrderId, OrderStatus};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nouie")]
#[command(author, version, about = "NO UIE store tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the current cart
    Checkout {
        /// Customer full name
        #[arg(short, long)]
        name: String,

        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// Customer phone number
        #[arg(short, long)]
        phone: String,

        /// Shipping address
        #[arg(short, long)]
        address: String,

        /// Order notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Manage locally saved orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print cart lines and totals
    Show,
    /// Add one unit of a product in a size
    Add {
        /// Product ID (e.g. CAT01)
        #[arg(long)]
        id: String,

        /// Product display name
        #[arg(long)]
        name: String,

        /// Size
        #[arg(long)]
        size: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,
    },
    /// Remove the line at a position (as listed by `cart show`)
    Remove {
        /// Zero-based line index
        index: usize,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List locally saved orders
    List,
    /// Set an order's status
    Status {
        /// Order ID
        id: OrderId,

        /// New status (pending, processing, shipped, delivered, cancelled)
        status: OrderStatus,
    },
}

/// Log filter used when `RUST_LOG` is unset. Warnings only, so command
/// output on stdout is not buried under per-operation info logs.
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("NOUIE_LOG_FORMAT").is_ok_and(|format| format == "json");

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add {
                id,
                name,
                size,
                price,
            } => commands::cart::add(&ctx, id, name, size, price),
            CartAction::Remove { index } => commands::cart::remove(&ctx, index)?,
            CartAction::Clear => commands::cart::clear(&ctx),
        },
        Commands::Checkout {
            name,
            email,
            phone,
            address,
            notes,
        } => {
            let form = nouie_cart::CheckoutForm {
                customer_name: name,
                customer_email: email,
                customer_phone: phone,
                shipping_address: address,
                notes,
            };
            commands::checkout::place_order(&ctx, form)?;
        }
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&ctx),
            OrdersAction::Status { id, status } => commands::orders::set_status(&ctx, id, status)?,
        },
    }
    Ok(())
}
