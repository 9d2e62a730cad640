//! Integration test harness for Tray.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tray-integration-tests
//! ```
//!
//! Tests run fully offline: the catalog is a stub `axum` server and the
//! storefront binds to an ephemeral port with its basket files in a temp
//! directory.
//!
//! # Test Categories
//!
//! - `basket` - Basket Store over the file-backed store
//! - `catalog` - Catalog client against the stub catalog
//! - `screens` - Storefront screens end to end over HTTP

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Router, http::StatusCode, routing::get};
use serde_json::{Value, json};
use tempfile::TempDir;
use tray_storefront::config::StorefrontConfig;
use tray_storefront::routes;
use tray_storefront::state::AppState;
use tray_storefront::storage::FileStore;

/// Three products shaped like the public catalog's response.
#[must_use]
pub fn fixture_products() -> Value {
    json!([
        {
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use.",
            "category": "men's clothing",
            "image": "https://img.example/1.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 22.3,
            "description": "Slim-fitting style.",
            "category": "men's clothing",
            "image": "https://img.example/2.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        },
        {
            "id": 3,
            "title": "Womens Rain Jacket",
            "price": 39.99,
            "image": "https://img.example/3.jpg"
        }
    ])
}

/// A running stub catalog.
pub struct StubCatalog {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl StubCatalog {
    /// Serve `body` with `status` at `GET /products`.
    pub async fn spawn(status: StatusCode, body: String) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        let app = Router::new().route(
            "/products",
            get(move || {
                let body = body.clone();
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (
                        status,
                        [(axum::http::header::CONTENT_TYPE, "application/json")],
                        body,
                    )
                }
            }),
        );

        let addr = serve(app).await;
        Self { addr, hits }
    }

    /// Serve the fixture products.
    pub async fn with_fixtures() -> Self {
        Self::spawn(StatusCode::OK, fixture_products().to_string()).await
    }

    /// Base URL to configure as `TRAY_CATALOG_URL`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests the stub has answered.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Storefront configuration pointing at `catalog_url` and `data_dir`.
#[must_use]
pub fn test_config(catalog_url: &str, data_dir: &std::path::Path) -> StorefrontConfig {
    let data_dir = data_dir.display().to_string();
    StorefrontConfig::from_lookup(|key| match key {
        "TRAY_CATALOG_URL" => Some(catalog_url.to_string()),
        "TRAY_DATA_DIR" => Some(data_dir.clone()),
        _ => None,
    })
    .unwrap()
}

/// A storefront running on an ephemeral port.
pub struct TestApp {
    pub addr: SocketAddr,
    pub state: AppState,
    pub data_dir: TempDir,
    /// Client that does not follow redirects, so tests can inspect them.
    pub client: reqwest::Client,
}

impl TestApp {
    /// Start a storefront backed by files in a fresh temp directory.
    pub async fn spawn(catalog_url: &str) -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        let config = test_config(catalog_url, data_dir.path());
        let storage = Arc::new(FileStore::new(config.data_dir.clone()));
        let state = AppState::with_storage(config, storage).unwrap();

        let addr = serve(routes::app(state.clone())).await;
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            addr,
            state,
            data_dir,
            client,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// `GET path` and return status and body.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    /// `POST path` with a form body and return status and `Location`.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> (reqwest::StatusCode, String) {
        let response = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap();
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string())
            .unwrap_or_default();
        (response.status(), location)
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
