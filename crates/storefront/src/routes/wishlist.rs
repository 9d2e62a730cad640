//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;
use tray_core::ProductId;

use super::{FlashQuery, FormInput, LayoutView, Outcome, ProductView, Screen, redirect, resolve_product};
use crate::basket::Notice;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Toggle wishlist form data.
#[derive(Debug, Deserialize)]
pub struct ToggleWishlistForm {
    pub product_id: ProductId,
    pub return_to: Option<String>,
}

/// Add to tray form data, posted from the Wishlist screen.
#[derive(Debug, Deserialize)]
pub struct AddToTrayForm {
    pub product_id: ProductId,
}

/// Remove from wishlist form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromWishlistForm {
    pub product_id: ProductId,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub layout: LayoutView,
    pub products: Vec<ProductView>,
}

/// Display wishlist page.
#[instrument(skip(state, flash))]
pub async fn show(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> impl IntoResponse {
    let wishlist = state.basket().load_wishlist().await;

    WishlistShowTemplate {
        layout: LayoutView::load(&state, Screen::Wishlist, &flash).await,
        products: wishlist
            .iter()
            .map(|entry| ProductView::new(&entry.product, true))
            .collect(),
    }
}

/// Add a product to the wishlist, or remove it if already there.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    form: FormInput<ToggleWishlistForm>,
) -> Result<Redirect> {
    let Form(form) = form?;
    let product = resolve_product(&state, form.product_id).await?;
    let product_id = form.product_id.to_string();
    add_breadcrumb("wishlist", "Toggle wishlist", Some(&[("product_id", product_id.as_str())]));

    let basket = state.basket();
    let result = async {
        let wishlist = basket.try_load_wishlist().await?;
        basket.toggle_wishlist(&wishlist, &product).await
    }
    .await;

    Ok(redirect(form.return_to.as_deref(), "/", &Outcome::from(result)))
}

/// Add one unit of a wishlisted product to the cart.
///
/// Same as adding from any other screen, but confirmed with the wishlist's
/// own notice and always returning to the Wishlist screen.
#[instrument(skip(state))]
pub async fn add_to_tray(
    State(state): State<AppState>,
    form: FormInput<AddToTrayForm>,
) -> Result<Redirect> {
    let Form(form) = form?;
    let product = resolve_product(&state, form.product_id).await?;
    let product_id = form.product_id.to_string();
    add_breadcrumb("wishlist", "Add to tray", Some(&[("product_id", product_id.as_str())]));

    let outcome = match state.basket().add_to_cart(&product).await {
        Ok(_) => Outcome::Notice(Notice::CartAddedFromWishlist),
        Err(_) => Outcome::SaveFailed,
    };

    Ok(redirect(None, "/wishlist", &outcome))
}

/// Remove a product from the wishlist.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    form: FormInput<RemoveFromWishlistForm>,
) -> Result<Redirect> {
    let Form(form) = form?;
    let basket = state.basket();
    let result = async {
        let wishlist = basket.try_load_wishlist().await?;
        basket.remove_from_wishlist(&wishlist, form.product_id).await
    }
    .await;

    Ok(redirect(None, "/wishlist", &Outcome::from(result)))
}
