//! Product details screen.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::instrument;
use tray_core::ProductId;

use super::{FlashQuery, LayoutView, PathInput, ProductView, Screen};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: LayoutView,
    pub product: ProductView,
    pub return_to: String,
}

/// Display product detail page.
#[instrument(skip(state, flash))]
pub async fn show(
    State(state): State<AppState>,
    id: PathInput<ProductId>,
    Query(flash): Query<FlashQuery>,
) -> Result<impl IntoResponse> {
    let Path(id) = id?;
    let product = state.catalog().product(id).await?;
    let wishlisted = state.basket().is_wishlisted(id).await;
    let layout = LayoutView::load(&state, Screen::ProductDetails, &flash).await;

    Ok(ProductShowTemplate {
        layout,
        product: ProductView::new(&product, wishlisted),
        return_to: format!("/products/{id}"),
    })
}
