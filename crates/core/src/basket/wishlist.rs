//! The wishlist: a set of products kept in insertion order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// A wishlisted product. Serializes as the bare product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistEntry {
    pub product: Product,
}

impl WishlistEntry {
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }
}

/// Outcome of [`Wishlist::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Ordered wishlist entries, one per product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a wishlist from raw entries, dropping later duplicates of an id.
    ///
    /// Returns the wishlist and the number of entries dropped.
    #[must_use]
    pub fn from_entries(entries: Vec<WishlistEntry>) -> (Self, usize) {
        let before = entries.len();
        let mut seen = HashSet::with_capacity(before);
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.id()))
            .collect();
        let dropped = before - entries.len();
        (Self { entries }, dropped)
    }

    /// Consume the collection, returning its entries in order.
    #[must_use]
    pub fn into_entries(self) -> Vec<WishlistEntry> {
        self.entries
    }

    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WishlistEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&WishlistEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Remove `product` if present, otherwise append it.
    pub fn toggle(&mut self, product: &Product) -> Toggle {
        if self.remove(product.id).is_some() {
            Toggle::Removed
        } else {
            self.entries.push(WishlistEntry::new(product.clone()));
            Toggle::Added
        }
    }

    /// Remove the entry for `id`, if present.
    pub fn remove(&mut self, id: ProductId) -> Option<WishlistEntry> {
        let index = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(index))
    }
}

impl<'a> IntoIterator for &'a Wishlist {
    type Item = &'a WishlistEntry;
    type IntoIter = std::slice::Iter<'a, WishlistEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
