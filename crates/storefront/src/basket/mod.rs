//! Persistence-backed cart and wishlist manager.
//!
//! # Architecture
//!
//! - One shared [`BasketStore`] per process; every screen and the CLI go
//!   through it instead of touching storage directly
//! - Each mutation is a full read-modify-write: the whole collection is
//!   serialized and stored under its key
//! - Mutations are serialized by an async mutex so no two read-modify-write
//!   cycles interleave
//! - After every successful write a [`BasketEvent`] is broadcast so open
//!   consumers can refresh
//!
//! # Failure model
//!
//! [`BasketStore::load_cart`] and [`BasketStore::load_wishlist`] never fail:
//! absent keys, unreadable storage and malformed JSON all yield an empty
//! collection (logged). They are for display only. A mutation must start from
//! [`BasketStore::try_load_cart`] / [`BasketStore::try_load_wishlist`], which
//! still treat malformed JSON as empty but return a storage read error, so a
//! failed read never turns into a write that replaces the stored collection.
//!
//! Writes that fail are logged and returned as [`BasketError`]; the caller's
//! working copy is left untouched and nothing is broadcast.

mod notice;

pub use notice::Notice;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::{Mutex, broadcast};
use tracing::{info, instrument, warn};

use tray_core::{Cart, Product, ProductId, Toggle, Wishlist};

use crate::storage::{KeyValueStore, StorageError, keys};

/// Capacity of the change-notification channel.
const EVENT_CAPACITY: usize = 64;

/// Errors that can occur when persisting a collection.
#[derive(Debug, Error)]
pub enum BasketError {
    /// The key-value store rejected the write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The collection could not be serialized.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Update<T> {
    /// The collection as persisted.
    pub value: T,
    /// Confirmation to show the user, if the operation has one.
    pub notice: Option<Notice>,
}

/// Change notification published after every successful write.
#[derive(Debug, Clone, PartialEq)]
pub enum BasketEvent {
    CartChanged(Cart),
    WishlistChanged(Wishlist),
}

/// A collection persisted under a fixed key.
trait Collection: Serialize + DeserializeOwned + Default + Clone {
    const KEY: &'static str;

    /// Drop entries violating one-entry-per-product; returns the number dropped.
    fn normalize(self) -> (Self, usize);

    fn into_event(self) -> BasketEvent;
}

impl Collection for Cart {
    const KEY: &'static str = keys::CART;

    fn normalize(self) -> (Self, usize) {
        Self::from_entries(self.into_entries())
    }

    fn into_event(self) -> BasketEvent {
        BasketEvent::CartChanged(self)
    }
}

impl Collection for Wishlist {
    const KEY: &'static str = keys::WISHLIST;

    fn normalize(self) -> (Self, usize) {
        Self::from_entries(self.into_entries())
    }

    fn into_event(self) -> BasketEvent {
        BasketEvent::WishlistChanged(self)
    }
}

/// Manager for the cart and wishlist collections.
///
/// Cheaply cloneable; clones share storage, the write lock and the event
/// channel.
#[derive(Clone)]
pub struct BasketStore {
    inner: Arc<BasketStoreInner>,
}

struct BasketStoreInner {
    storage: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
    events: broadcast::Sender<BasketEvent>,
}

impl BasketStore {
    /// Create a basket store over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(BasketStoreInner {
                storage,
                write_lock: Mutex::new(()),
                events,
            }),
        }
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BasketEvent> {
        self.inner.events.subscribe()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Load the persisted cart; empty if absent or unreadable.
    pub async fn load_cart(&self) -> Cart {
        self.load().await
    }

    /// Load the persisted wishlist; empty if absent or unreadable.
    pub async fn load_wishlist(&self) -> Wishlist {
        self.load().await
    }

    /// Load the persisted cart as the base for a mutation.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::Storage` if the store cannot be read. Malformed
    /// data still loads as an empty cart.
    pub async fn try_load_cart(&self) -> Result<Cart, BasketError> {
        self.try_load_logged().await
    }

    /// Load the persisted wishlist as the base for a mutation.
    ///
    /// # Errors
    ///
    /// Returns `BasketError::Storage` if the store cannot be read.
    pub async fn try_load_wishlist(&self) -> Result<Wishlist, BasketError> {
        self.try_load_logged().await
    }

    /// Total units in the persisted cart.
    pub async fn cart_count(&self) -> u64 {
        self.load_cart().await.item_count()
    }

    /// Whether `id` is in the persisted wishlist.
    pub async fn is_wishlisted(&self, id: ProductId) -> bool {
        self.load_wishlist().await.contains(id)
    }

    /// The stored copy of product `id`, from the wishlist or else the cart.
    pub async fn held_product(&self, id: ProductId) -> Option<Product> {
        if let Some(entry) = self.load_wishlist().await.get(id) {
            return Some(entry.product.clone());
        }
        self.load_cart().await.get(id).map(|entry| entry.product.clone())
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add one unit of `product` to the persisted cart.
    ///
    /// Reads the stored cart rather than a caller's copy, increments the
    /// matching entry or appends a new one, and writes the result back.
    ///
    /// # Errors
    ///
    /// Returns `BasketError` if the stored cart cannot be read or the updated
    /// cart cannot be stored. Nothing is written after a failed read.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: &Product) -> Result<Update<Cart>, BasketError> {
        let _guard = self.inner.write_lock.lock().await;

        let mut cart = self.try_load_cart().await?;
        let quantity = cart.add(product);
        self.persist(&cart).await?;

        info!(quantity = quantity.get(), "Added to cart");
        Ok(Update {
            value: cart,
            notice: Some(Notice::CartAdded),
        })
    }

    /// Adjust the quantity of `id` in `cart` by `delta`, clamping at one.
    ///
    /// Persists the result even when `id` is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `BasketError` if the updated cart cannot be stored.
    #[instrument(skip(self, cart))]
    pub async fn update_quantity(
        &self,
        cart: &Cart,
        id: ProductId,
        delta: i64,
    ) -> Result<Update<Cart>, BasketError> {
        let _guard = self.inner.write_lock.lock().await;

        let mut cart = cart.clone();
        if cart.update_quantity(id, delta).is_none() {
            warn!("Quantity update for product not in cart");
        }
        self.persist(&cart).await?;

        Ok(Update {
            value: cart,
            notice: None,
        })
    }

    /// Remove `id` from `cart`. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `BasketError` if the updated cart cannot be stored.
    #[instrument(skip(self, cart))]
    pub async fn remove_from_cart(
        &self,
        cart: &Cart,
        id: ProductId,
    ) -> Result<Update<Cart>, BasketError> {
        let _guard = self.inner.write_lock.lock().await;

        let mut cart = cart.clone();
        cart.remove(id);
        self.persist(&cart).await?;

        Ok(Update {
            value: cart,
            notice: None,
        })
    }

    // =========================================================================
    // Wishlist mutations
    // =========================================================================

    /// Remove `product` from `wishlist` if present, otherwise append it.
    ///
    /// # Errors
    ///
    /// Returns `BasketError` if the updated wishlist cannot be stored.
    #[instrument(skip(self, wishlist, product), fields(product_id = %product.id))]
    pub async fn toggle_wishlist(
        &self,
        wishlist: &Wishlist,
        product: &Product,
    ) -> Result<Update<Wishlist>, BasketError> {
        let _guard = self.inner.write_lock.lock().await;

        let mut wishlist = wishlist.clone();
        let notice = match wishlist.toggle(product) {
            Toggle::Added => Notice::WishlistAdded,
            Toggle::Removed => Notice::WishlistRemoved,
        };
        self.persist(&wishlist).await?;

        info!(notice = notice.slug(), "Toggled wishlist");
        Ok(Update {
            value: wishlist,
            notice: Some(notice),
        })
    }

    /// Remove `id` from `wishlist`.
    ///
    /// # Errors
    ///
    /// Returns `BasketError` if the updated wishlist cannot be stored.
    #[instrument(skip(self, wishlist))]
    pub async fn remove_from_wishlist(
        &self,
        wishlist: &Wishlist,
        id: ProductId,
    ) -> Result<Update<Wishlist>, BasketError> {
        let _guard = self.inner.write_lock.lock().await;

        let mut wishlist = wishlist.clone();
        wishlist.remove(id);
        self.persist(&wishlist).await?;

        Ok(Update {
            value: wishlist,
            notice: Some(Notice::WishlistRemoved),
        })
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    async fn load<C: Collection>(&self) -> C {
        self.try_load().await.unwrap_or_else(|e| {
            warn!(key = C::KEY, error = %e, "Failed to read collection, using empty");
            C::default()
        })
    }

    async fn try_load_logged<C: Collection>(&self) -> Result<C, BasketError> {
        self.try_load().await.map_err(|e| {
            tracing::error!(key = C::KEY, error = %e, "Failed to read collection");
            BasketError::from(e)
        })
    }

    /// Read a collection. Absent or malformed data is empty; only a storage
    /// read error is returned.
    async fn try_load<C: Collection>(&self) -> Result<C, StorageError> {
        let Some(raw) = self.inner.storage.get(C::KEY).await? else {
            return Ok(C::default());
        };

        let parsed: C = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(key = C::KEY, error = %e, "Malformed collection, using empty");
                return Ok(C::default());
            }
        };

        let (collection, dropped) = parsed.normalize();
        if dropped > 0 {
            warn!(key = C::KEY, dropped, "Dropped duplicate entries from collection");
        }
        Ok(collection)
    }

    async fn persist<C: Collection>(&self, collection: &C) -> Result<(), BasketError> {
        let json = serde_json::to_string(collection)?;
        if let Err(e) = self.inner.storage.set(C::KEY, &json).await {
            tracing::error!(key = C::KEY, error = %e, "Failed to persist collection");
            return Err(e.into());
        }

        // No subscribers is not an error.
        let _ = self.inner.events.send(collection.clone().into_event());
        Ok(())
    }
}
