//! Cart commands.

use std::fmt::Write;

use tray_core::{Cart, Product, ProductId};

use super::{CommandError, Context};

/// Show cart contents and total.
pub async fn show(ctx: &Context) -> String {
    render(&ctx.basket.load_cart().await)
}

/// Add one unit of product `id`.
pub async fn add(ctx: &Context, id: ProductId) -> Result<String, CommandError> {
    let product = resolve(ctx, id).await?;
    let update = ctx.basket.add_to_cart(&product).await?;

    let mut out = render(&update.value);
    if let Some(notice) = update.notice {
        out = format!("{notice}\n\n{out}");
    }
    Ok(out)
}

/// Change the quantity of `id` by `delta`.
pub async fn update(ctx: &Context, id: ProductId, delta: i64) -> Result<String, CommandError> {
    let cart = ctx.basket.try_load_cart().await?;
    let update = ctx.basket.update_quantity(&cart, id, delta).await?;
    Ok(render(&update.value))
}

/// Remove product `id` from the cart.
pub async fn remove(ctx: &Context, id: ProductId) -> Result<String, CommandError> {
    let cart = ctx.basket.try_load_cart().await?;
    let update = ctx.basket.remove_from_cart(&cart, id).await?;
    Ok(render(&update.value))
}

/// Prefer the stored copy so basket edits work offline.
pub(super) async fn resolve(ctx: &Context, id: ProductId) -> Result<Product, CommandError> {
    match ctx.basket.held_product(id).await {
        Some(product) => Ok(product),
        None => Ok(ctx.catalog.product(id).await?),
    }
}

fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Your cart is empty".to_string();
    }

    let mut out = String::new();
    for entry in cart {
        let _ = writeln!(
            out,
            "{:>4}  {:>3} x {:>10}  {:>10}  {}",
            entry.id(),
            entry.quantity.get(),
            entry.product.price.display(),
            entry.line_total().display(),
            entry.product.title
        );
    }
    let _ = write!(
        out,
        "Total: {} ({} items)",
        cart.total_price().display(),
        cart.item_count()
    );
    out
}
