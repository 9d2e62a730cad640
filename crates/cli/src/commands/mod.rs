//! Command implementations.
//!
//! Each command returns the text to print so the rendering can be tested
//! without a terminal.

pub mod cart;
pub mod catalog;
pub mod wishlist;

use std::sync::Arc;

use thiserror::Error;
use tray_storefront::basket::{BasketError, BasketStore};
use tray_storefront::catalog::{CatalogClient, CatalogError};
use tray_storefront::config::{ConfigError, StorefrontConfig};
use tray_storefront::storage::{FileStore, KeyValueStore};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart or wishlist could not be saved.
    #[error("Could not save changes: {0}")]
    Basket(#[from] BasketError),
}

/// Catalog client and basket store shared by all commands.
pub struct Context {
    pub catalog: CatalogClient,
    pub basket: BasketStore,
}

impl Context {
    /// Build a context from the storefront environment.
    pub fn from_env() -> Result<Self, CommandError> {
        let config = StorefrontConfig::from_env()?;
        let store = FileStore::new(config.data_dir.clone());
        tracing::debug!(data_dir = %store.dir().display(), "Using basket files");

        let storage: Arc<dyn KeyValueStore> = Arc::new(store);
        Self::new(&config, storage)
    }

    /// Build a context over an explicit storage backend.
    pub fn new(
        config: &StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, CommandError> {
        Ok(Self {
            catalog: CatalogClient::new(&config.catalog)?,
            basket: BasketStore::new(storage),
        })
    }
}
