//! Tray CLI - catalog lookups and basket management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered by title
//! tray products --search shirt
//!
//! # Show one product
//! tray product 3
//!
//! # Manage the cart
//! tray cart add 3
//! tray cart update 3 --delta -1
//! tray cart remove 3
//! tray cart show
//!
//! # Manage the wishlist
//! tray wishlist toggle 3
//! tray wishlist show
//! ```
//!
//! The CLI reads the same environment as the storefront server
//! (`TRAY_DATA_DIR`, `TRAY_CATALOG_URL`, ...) and edits the same files.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use tray_core::ProductId;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "tray")]
#[command(author, version, about = "Tray storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Products {
        /// Only show products whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one catalog product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Change a product's quantity by a signed delta
    Update {
        /// Product ID
        id: ProductId,

        /// Quantity change; the result never goes below one
        #[arg(short, long, allow_negative_numbers = true, default_value_t = 1)]
        delta: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show wishlist contents
    Show,
    /// Add a product, or remove it if already wishlisted
    Toggle {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product from the wishlist
    Remove {
        /// Product ID
        id: ProductId,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let ctx = Context::from_env()?;

    let output = match cli.command {
        Commands::Products { search } => {
            commands::catalog::list(&ctx, search.as_deref().unwrap_or_default()).await?
        }
        Commands::Product { id } => commands::catalog::show(&ctx, id).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx).await,
            CartAction::Add { id } => commands::cart::add(&ctx, id).await?,
            CartAction::Update { id, delta } => commands::cart::update(&ctx, id, delta).await?,
            CartAction::Remove { id } => commands::cart::remove(&ctx, id).await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&ctx).await,
            WishlistAction::Toggle { id } => commands::wishlist::toggle(&ctx, id).await?,
            WishlistAction::Remove { id } => commands::wishlist::remove(&ctx, id).await?,
        },
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_delta() {
        let cli = Cli::try_parse_from(["tray", "cart", "update", "3", "--delta", "-2"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Update { delta: -2, .. }
            })
        ));
    }
}
