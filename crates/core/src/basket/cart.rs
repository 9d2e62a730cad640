//! The shopping cart ("tray").

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId, Quantity};

/// A product in the cart together with how many units were added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: Quantity,
}

impl CartEntry {
    /// A fresh entry with quantity one.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: Quantity::ONE,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// Ordered cart entries, one per product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from raw entries, dropping later duplicates of an id.
    ///
    /// Returns the cart and the number of entries dropped.
    #[must_use]
    pub fn from_entries(entries: Vec<CartEntry>) -> (Self, usize) {
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
    pub fn into_entries(self) -> Vec<CartEntry> {
        self.entries
    }

    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
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
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Add one unit of `product`.
    ///
    /// An existing entry is incremented in place; otherwise a new entry with
    /// quantity one is appended. Returns the resulting quantity.
    pub fn add(&mut self, product: &Product) -> Quantity {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id() == product.id) {
            entry.quantity = entry.quantity.incremented();
            return entry.quantity;
        }
        self.entries.push(CartEntry::new(product.clone()));
        Quantity::ONE
    }

    /// Set the matching entry's quantity to `max(1, quantity + delta)`.
    ///
    /// Returns the new quantity, or `None` if no entry has `id`.
    pub fn update_quantity(&mut self, id: ProductId, delta: i64) -> Option<Quantity> {
        let entry = self.entries.iter_mut().find(|e| e.id() == id)?;
        entry.quantity = entry.quantity.adjusted(delta);
        Some(entry.quantity)
    }

    /// Remove the entry for `id`, if present.
    pub fn remove(&mut self, id: ProductId) -> Option<CartEntry> {
        let index = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(index))
    }

    /// Sum of `price * quantity` over all entries.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity.get()))
            .sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
