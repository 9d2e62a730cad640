//! Home screen: the product grid with title search.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;
use tray_core::filter_products;
use url::form_urlencoded;

use super::{FlashQuery, LayoutView, ProductView, Screen};
use crate::filters;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutView,
    /// Search text as typed, echoed back into the search box.
    pub query: String,
    pub products: Vec<ProductView>,
    /// The catalog could not be fetched.
    pub load_failed: bool,
    /// Path this page posts back to after a mutation.
    pub return_to: String,
}

/// Display the home page.
#[instrument(skip(state, flash))]
pub async fn home(
    State(state): State<AppState>,
    Query(search): Query<SearchQuery>,
    Query(flash): Query<FlashQuery>,
) -> impl IntoResponse {
    let layout = LayoutView::load(&state, Screen::Home, &flash).await;
    let wishlist = state.basket().load_wishlist().await;

    let (products, load_failed) = match state.catalog().products().await {
        Ok(all) => {
            let products = filter_products(&all, &search.q)
                .iter()
                .map(|p| ProductView::new(p, wishlist.contains(p.id)))
                .collect();
            (products, false)
        }
        Err(e) => {
            tracing::error!("Failed to load products: {e}");
            (Vec::new(), true)
        }
    };

    HomeTemplate {
        layout,
        return_to: home_path(&search.q),
        query: search.q,
        products,
        load_failed,
    }
}

/// Path of the home screen with the current search applied.
fn home_path(query: &str) -> String {
    if query.is_empty() {
        return "/".to_string();
    }
    let encoded: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("q", query)
        .finish();
    format!("/?{encoded}")
}
