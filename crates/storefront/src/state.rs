//! Application state shared across handlers.

use std::sync::Arc;

use crate::basket::BasketStore;
use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::storage::{FileStore, KeyValueStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog client and the single basket store every screen goes through.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    basket: BasketStore,
}

impl AppState {
    /// Create application state persisting to `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let storage = Arc::new(FileStore::new(config.data_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Create application state over an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built.
    pub fn with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let basket = BasketStore::new(storage);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                basket,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the basket store.
    #[must_use]
    pub fn basket(&self) -> &BasketStore {
        &self.inner.basket
    }
}
