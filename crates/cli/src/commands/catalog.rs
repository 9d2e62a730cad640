//! Catalog lookups.

use std::fmt::Write;

use tray_core::{Product, ProductId, filter_products};

use super::{CommandError, Context};

/// List products whose title contains `search` (all when empty).
pub async fn list(ctx: &Context, search: &str) -> Result<String, CommandError> {
    let products = ctx.catalog.products().await?;
    let matches = filter_products(&products, search);
    tracing::debug!(total = products.len(), matched = matches.len(), "Filtered products");

    Ok(render_list(&matches))
}

/// Show a single product.
pub async fn show(ctx: &Context, id: ProductId) -> Result<String, CommandError> {
    let product = ctx.catalog.product(id).await?;
    Ok(render_product(&product))
}

fn render_list(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }

    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "{:>4}  {:>10}  {}",
            product.id,
            product.price.display(),
            product.title
        );
    }
    out.trim_end().to_string()
}

fn render_product(product: &Product) -> String {
    let mut out = format!("#{} {}\n", product.id, product.title);
    let _ = writeln!(out, "Price: {}", product.price.display());
    if let Some(category) = &product.category {
        let _ = writeln!(out, "Category: {category}");
    }
    if let Some(rating) = &product.rating {
        let _ = writeln!(out, "Rating: {:.1} ({} reviews)", rating.rate, rating.count);
    }
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    out.trim_end().to_string()
}
