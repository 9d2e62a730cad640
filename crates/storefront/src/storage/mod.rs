//! Key-value storage for persisted basket state.
//!
//! # Architecture
//!
//! - String values by string key, no transactions, last write wins
//! - [`FileStore`] keeps one `<key>.json` file per key in a data directory
//! - [`MemoryStore`] keeps values in a `HashMap` for tests and throwaway runs
//!
//! The basket store is the only consumer; it holds the backend as
//! `Arc<dyn KeyValueStore>` so the server and CLI can share one
//! implementation while tests swap in their own.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Fixed keys under which collections are persisted.
pub mod keys {
    /// Key for the serialized cart.
    pub const CART: &str = "cart";

    /// Key for the serialized wishlist.
    pub const WISHLIST: &str = "wishlist";
}

/// Errors that can occur when reading or writing stored values.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters that cannot be stored.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Abstraction over a string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Succeeds if the key does not exist.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reject keys that are empty or contain anything but `[A-Za-z0-9_-]`.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
