//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home screen (product grid, `?q=` search)
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products/{id}          - Product details
//!
//! # Cart
//! GET  /cart                   - Cart screen
//! POST /cart/add               - Add one unit (redirects with a notice)
//! POST /cart/update            - Adjust quantity by a delta
//! POST /cart/remove            - Remove a line
//!
//! # Wishlist
//! GET  /wishlist               - Wishlist screen
//! POST /wishlist/toggle        - Add or remove (redirects with a notice)
//! POST /wishlist/add-to-tray   - Add one unit to the cart from the wishlist
//! POST /wishlist/remove        - Remove an entry
//! ```
//!
//! Mutations follow post/redirect/get. The redirect target carries the
//! outcome as `?notice=<slug>` or `?error=save-failed`, which the next screen
//! renders as a banner.

pub mod cart;
pub mod home;
pub mod products;
pub mod wishlist;

use axum::{
    Form, Router,
    extract::{Path, rejection::{FormRejection, PathRejection}},
    middleware as axum_middleware,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tray_core::{Product, ProductId};
use url::form_urlencoded;

use crate::basket::{BasketError, Notice, Update};
use crate::error::Result;
use crate::middleware::{make_request_span, request_id_middleware};
use crate::state::AppState;

/// A posted form, or the reason it could not be decoded. Handlers turn the
/// rejection into a 400 through [`crate::error::AppError`].
pub type FormInput<T> = std::result::Result<Form<T>, FormRejection>;

/// A path parameter, or the reason it could not be parsed.
pub type PathInput<T> = std::result::Result<Path<T>, PathRejection>;

/// Error slug used when a basket change could not be saved.
pub const SAVE_FAILED: &str = "save-failed";

/// The screens a shopper can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    ProductDetails,
    Cart,
    Wishlist,
}

impl Screen {
    /// Page title shown in the header.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Products",
            Self::ProductDetails => "Product Details",
            Self::Cart => "Cart",
            Self::Wishlist => "Wishlist",
        }
    }
}

/// Banner shown at the top of a screen.
#[derive(Debug, Clone)]
pub struct BannerView {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

/// Shared layout data every screen template receives.
#[derive(Debug, Clone)]
pub struct LayoutView {
    pub screen: Screen,
    pub cart_count: u64,
    pub banner: Option<BannerView>,
}

impl LayoutView {
    /// Load the layout for `screen`, reading the persisted cart for the badge.
    pub async fn load(state: &AppState, screen: Screen, flash: &FlashQuery) -> Self {
        Self {
            screen,
            cart_count: state.basket().cart_count().await,
            banner: flash.banner(),
        }
    }

    /// The floating wishlist button is shown on every screen except Wishlist.
    #[must_use]
    pub const fn show_wishlist_button(&self) -> bool {
        !matches!(self.screen, Screen::Wishlist)
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.screen.title()
    }
}

/// Outcome of the previous mutation, carried across a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl FlashQuery {
    /// Resolve the query into a banner. Unknown slugs are ignored.
    #[must_use]
    pub fn banner(&self) -> Option<BannerView> {
        if self.error.as_deref() == Some(SAVE_FAILED) {
            return Some(BannerView {
                title: "Error".to_string(),
                message: "Could not save your changes. Please try again.".to_string(),
                is_error: true,
            });
        }

        let notice = Notice::from_slug(self.notice.as_deref()?)?;
        Some(BannerView {
            title: notice.title().to_string(),
            message: notice.message().to_string(),
            is_error: false,
        })
    }
}

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub image: String,
    pub description: String,
    pub category: Option<String>,
    pub rating: Option<String>,
    pub wishlisted: bool,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, wishlisted: bool) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            rating: product
                .rating
                .as_ref()
                .map(|r| format!("{:.1} ({} reviews)", r.rate, r.count)),
            wishlisted,
        }
    }
}

// =============================================================================
// Redirects
// =============================================================================

/// Where to send the shopper after a mutation.
enum Outcome {
    Notice(Notice),
    SaveFailed,
    Silent,
}

impl<T> From<std::result::Result<Update<T>, BasketError>> for Outcome {
    fn from(result: std::result::Result<Update<T>, BasketError>) -> Self {
        match result {
            Ok(update) => update.notice.map_or(Self::Silent, Self::Notice),
            Err(_) => Self::SaveFailed,
        }
    }
}

/// Accept `return_to` only if it is a path on this site.
///
/// Rejects absolute URLs, scheme-relative `//host` paths and backslash tricks
/// some browsers normalize into either.
fn local_path(return_to: Option<&str>) -> Option<&str> {
    let path = return_to?.trim();
    let is_local = path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control);
    is_local.then_some(path)
}

/// Build the redirect target: `return_to` (or `fallback`) with any stale
/// `notice`/`error` pairs replaced by the new outcome.
fn redirect_target(return_to: Option<&str>, fallback: &str, outcome: &Outcome) -> String {
    let target = local_path(return_to).unwrap_or(fallback);
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key != "notice" && key != "error" {
            serializer.append_pair(&key, &value);
        }
    }
    match outcome {
        Outcome::Notice(notice) => {
            serializer.append_pair("notice", notice.slug());
        }
        Outcome::SaveFailed => {
            serializer.append_pair("error", SAVE_FAILED);
        }
        Outcome::Silent => {}
    }

    let query = serializer.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

fn redirect(return_to: Option<&str>, fallback: &str, outcome: &Outcome) -> Redirect {
    Redirect::to(&redirect_target(return_to, fallback, outcome))
}

/// Find a product by id, preferring the copies already held in the basket so
/// basket screens keep working while the catalog is unreachable.
async fn resolve_product(state: &AppState, id: ProductId) -> Result<Product> {
    if let Some(product) = state.basket().held_product(id).await {
        return Ok(product);
    }
    Ok(state.catalog().product(id).await?)
}

// =============================================================================
// Router
// =============================================================================

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/toggle", post(wishlist::toggle))
        .route("/add-to-tray", post(wishlist::add_to_tray))
        .route("/remove", post(wishlist::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
}

/// Build the complete application router with its middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use async_trait::async_trait;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::storage::{KeyValueStore, MemoryStore, StorageError, keys};

    fn app_over(storage: Arc<dyn KeyValueStore>) -> Router {
        // Nothing listens on port 9; catalog calls fail fast.
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "TRAY_CATALOG_URL").then(|| "http://127.0.0.1:9".to_string())
        })
        .unwrap();
        app(AppState::with_storage(config, storage).unwrap())
    }

    fn test_app() -> Router {
        app_over(Arc::new(MemoryStore::new()))
    }

    /// Reads fail, writes go through.
    struct UnreadableStore(MemoryStore);

    #[async_trait]
    impl KeyValueStore for UnreadableStore {
        async fn get(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("permission denied")))
        }

        async fn set(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            self.0.set(key, value).await
        }

        async fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
            self.0.remove(key).await
        }
    }

    fn form_post(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_empty_screens() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(Request::get("/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Your cart is empty"));
        assert!(html.contains("id=\"wishlist-button\""));

        let response = app
            .oneshot(Request::get("/wishlist").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Your wishlist is empty."));
        assert!(!html.contains("id=\"wishlist-button\""));
    }

    #[tokio::test]
    async fn test_home_shows_load_failure() {
        let response = test_app()
            .oneshot(Request::get("/?notice=cart-added").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Failed to load products"));
        assert!(html.contains("Item added to tray!"));
    }

    #[tokio::test]
    async fn test_cart_update_redirects_to_cart() {
        let request = Request::post("/cart/update")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("product_id=1&delta=-1"))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/cart");
    }

    #[tokio::test]
    async fn test_undecodable_input_is_bad_request() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(form_post("/cart/update", "product_id=1&delta=lots"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.starts_with("Bad request: "));

        let response = app
            .oneshot(Request::get("/products/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_mutations_after_failed_read_keep_stored_data() {
        let cart = r#"[{"id":1,"title":"A","price":1,"image":"","quantity":3}]"#;
        let wishlist = r#"[{"id":2,"title":"B","price":2,"image":""}]"#;
        let memory = MemoryStore::new();
        memory.set(keys::CART, cart).await.unwrap();
        memory.set(keys::WISHLIST, wishlist).await.unwrap();
        let app = app_over(Arc::new(UnreadableStore(memory.clone())));

        for (uri, body, location) in [
            ("/cart/update", "product_id=1&delta=1", "/cart?error=save-failed"),
            ("/cart/remove", "product_id=1", "/cart?error=save-failed"),
            ("/wishlist/remove", "product_id=2", "/wishlist?error=save-failed"),
        ] {
            let response = app.clone().oneshot(form_post(uri, body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(response.headers()[header::LOCATION], location, "{uri}");
        }

        assert_eq!(memory.get(keys::CART).await.unwrap().as_deref(), Some(cart));
        assert_eq!(memory.get(keys::WISHLIST).await.unwrap().as_deref(), Some(wishlist));
    }

    #[test]
    fn test_local_path_accepts_site_paths() {
        assert_eq!(local_path(Some("/cart")), Some("/cart"));
        assert_eq!(local_path(Some("/?q=shirt")), Some("/?q=shirt"));
        assert_eq!(local_path(Some(" /wishlist ")), Some("/wishlist"));
    }

    #[test]
    fn test_local_path_rejects_external_targets() {
        assert_eq!(local_path(None), None);
        assert_eq!(local_path(Some("")), None);
        assert_eq!(local_path(Some("https://evil.example")), None);
        assert_eq!(local_path(Some("//evil.example")), None);
        assert_eq!(local_path(Some("/\\evil.example")), None);
        assert_eq!(local_path(Some("cart")), None);
    }

    #[test]
    fn test_redirect_target_appends_notice() {
        let target = redirect_target(Some("/?q=bag"), "/", &Outcome::Notice(Notice::CartAdded));
        assert_eq!(target, "/?q=bag&notice=cart-added");
    }

    #[test]
    fn test_redirect_target_replaces_stale_flash() {
        let target = redirect_target(
            Some("/products/3?notice=cart-added&error=save-failed"),
            "/",
            &Outcome::Notice(Notice::WishlistAdded),
        );
        assert_eq!(target, "/products/3?notice=wishlist-added");

        let target = redirect_target(Some("/cart?notice=cart-added"), "/", &Outcome::Silent);
        assert_eq!(target, "/cart");
    }

    #[test]
    fn test_redirect_target_falls_back_for_external() {
        let target = redirect_target(Some("https://evil.example/"), "/cart", &Outcome::SaveFailed);
        assert_eq!(target, "/cart?error=save-failed");
    }

    #[test]
    fn test_flash_banner() {
        let flash = FlashQuery {
            notice: Some("wishlist-removed".to_string()),
            error: None,
        };
        let banner = flash.banner().unwrap_or_else(|| panic!("expected banner"));
        assert_eq!(banner.title, "Removed");
        assert_eq!(banner.message, "Item removed from wishlist.");
        assert!(!banner.is_error);

        let flash = FlashQuery {
            notice: Some("cart-added".to_string()),
            error: Some(SAVE_FAILED.to_string()),
        };
        assert!(flash.banner().is_some_and(|b| b.is_error));

        let flash = FlashQuery {
            notice: Some("bogus".to_string()),
            error: None,
        };
        assert!(flash.banner().is_none());
    }

    #[test]
    fn test_wishlist_button_hidden_on_wishlist() {
        let layout = |screen| LayoutView {
            screen,
            cart_count: 0,
            banner: None,
        };
        assert!(layout(Screen::Home).show_wishlist_button());
        assert!(layout(Screen::Cart).show_wishlist_button());
        assert!(layout(Screen::ProductDetails).show_wishlist_button());
        assert!(!layout(Screen::Wishlist).show_wishlist_button());
    }
}
