//! Product catalog API client.
//!
//! # Architecture
//!
//! - Single `GET {base_url}/products` returning the full ordered product list
//! - No pagination, no auth, no retry
//! - The list is cached in memory via `moka` (TTL from configuration); single
//!   product lookups are served from the cached list
//!
//! # Example
//!
//! ```rust,ignore
//! use tray_storefront::catalog::CatalogClient;
//!
//! let catalog = CatalogClient::new(&config.catalog)?;
//! let products = catalog.products().await?;
//! let product = catalog.product(ProductId::new(1)).await?;
//! ```

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use tray_core::{Product, ProductId};

use crate::config::CatalogConfig;

use cache::CacheKey;

/// Upper bound on a single catalog request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No product with this ID.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Base URL cannot be turned into an endpoint.
    #[error("Invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Client for the product catalog API.
///
/// Cheaply cloneable; clones share the HTTP client and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    products_url: Url,
    cache: Cache<CacheKey, Arc<[Product]>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the endpoint URL cannot be built or the HTTP
    /// client fails to initialize.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                products_url: products_endpoint(&config.base_url)?,
                cache,
            }),
        })
    }

    /// The full product list, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails, the catalog answers with a
    /// non-success status, or the body is not a JSON product array.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<[Product]>, CatalogError> {
        if let Some(products) = self.inner.cache.get(&CacheKey::Products).await {
            debug!(count = products.len(), "Catalog cache hit");
            return Ok(products);
        }

        let products: Arc<[Product]> = self.fetch_products().await?.into();
        self.inner
            .cache
            .insert(CacheKey::Products, Arc::clone(&products))
            .await;
        Ok(products)
    }

    /// A single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the catalog has no such product, or
    /// any error from [`CatalogClient::products`].
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products()
            .await?
            .iter()
            .find(|product| product.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    /// Drop cached responses so the next call refetches.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.products_url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let products: Vec<Product> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })?;

        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }
}

/// `{base}/products`, tolerating a trailing slash on `base`.
fn products_endpoint(base: &Url) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/products"))
}
