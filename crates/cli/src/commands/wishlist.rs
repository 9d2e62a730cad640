//! Wishlist commands.

use std::fmt::Write;

use tray_core::{ProductId, Wishlist};
use tray_storefront::basket::Notice;

use super::{CommandError, Context, cart};

/// Show wishlist contents.
pub async fn show(ctx: &Context) -> String {
    render(&ctx.basket.load_wishlist().await)
}

/// Add product `id` to the wishlist, or remove it if already there.
pub async fn toggle(ctx: &Context, id: ProductId) -> Result<String, CommandError> {
    let product = cart::resolve(ctx, id).await?;
    let wishlist = ctx.basket.try_load_wishlist().await?;
    let update = ctx.basket.toggle_wishlist(&wishlist, &product).await?;

    Ok(with_notice(update.notice, &update.value))
}

/// Remove product `id` from the wishlist.
pub async fn remove(ctx: &Context, id: ProductId) -> Result<String, CommandError> {
    let wishlist = ctx.basket.try_load_wishlist().await?;
    let update = ctx.basket.remove_from_wishlist(&wishlist, id).await?;

    Ok(with_notice(update.notice, &update.value))
}

fn with_notice(notice: Option<Notice>, wishlist: &Wishlist) -> String {
    match notice {
        Some(notice) => format!("{notice}\n\n{}", render(wishlist)),
        None => render(wishlist),
    }
}

fn render(wishlist: &Wishlist) -> String {
    if wishlist.is_empty() {
        return "Your wishlist is empty.".to_string();
    }

    let mut out = String::new();
    for entry in wishlist.iter() {
        let _ = writeln!(
            out,
            "{:>4}  {:>10}  {}",
            entry.id(),
            entry.product.price.display(),
            entry.product.title
        );
    }
    out.trim_end().to_string()
}
