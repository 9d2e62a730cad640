//! Cart route handlers.
//!
//! Every mutation goes through the shared `BasketStore` and answers with a
//! redirect back to the screen that posted it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;
use tray_core::{Cart, CartEntry, ProductId};

use super::{FlashQuery, FormInput, LayoutView, Outcome, Screen, redirect, resolve_product};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl From<&CartEntry> for CartItemView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            id: entry.id(),
            title: entry.product.title.clone(),
            image: entry.product.image.clone(),
            quantity: entry.quantity.get(),
            price: entry.product.price.display(),
            line_price: entry.line_total().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.iter().map(CartItemView::from).collect(),
            total: cart.total_price().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub return_to: Option<String>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    /// Signed change, usually `1` or `-1`.
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: LayoutView,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(state, flash))]
pub async fn show(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> impl IntoResponse {
    let cart = state.basket().load_cart().await;

    CartShowTemplate {
        layout: LayoutView::load(&state, Screen::Cart, &flash).await,
        cart: CartView::from(&cart),
    }
}

/// Add one unit of a product to the cart.
///
/// Unknown products answer 404. A failed save redirects with an error
/// banner and leaves the stored cart as it was.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    form: FormInput<AddToCartForm>,
) -> Result<Redirect> {
    let Form(form) = form?;
    let product = resolve_product(&state, form.product_id).await?;
    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Add to tray", Some(&[("product_id", product_id.as_str())]));

    let outcome = Outcome::from(state.basket().add_to_cart(&product).await);

    Ok(redirect(form.return_to.as_deref(), "/", &outcome))
}

/// Change a line's quantity by `delta`, never going below one.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    form: FormInput<UpdateCartForm>,
) -> Result<Redirect> {
    let Form(form) = form?;
    let basket = state.basket();
    let result = async {
        let cart = basket.try_load_cart().await?;
        basket.update_quantity(&cart, form.product_id, form.delta).await
    }
    .await;
    let outcome = Outcome::from(result);

    Ok(redirect(None, "/cart", &outcome))
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    form: FormInput<RemoveFromCartForm>,
) -> Result<Redirect> {
    let Form(form) = form?;
    let product_id = form.product_id.to_string();
    add_breadcrumb("cart", "Remove from cart", Some(&[("product_id", product_id.as_str())]));

    let basket = state.basket();
    let result = async {
        let cart = basket.try_load_cart().await?;
        basket.remove_from_cart(&cart, form.product_id).await
    }
    .await;
    let outcome = Outcome::from(result);

    Ok(redirect(None, "/cart", &outcome))
}
