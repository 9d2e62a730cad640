//! Tray Core - Shared domain types and pure basket operations.
//!
//! This crate provides the types used across all Tray components:
//! - `storefront` - Server-rendered storefront and the persistence-backed basket store
//! - `cli` - Command-line access to the catalog, cart and wishlist
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. Every cart and wishlist rule (one entry per product,
//! quantity never below one, insertion order preserved) lives here so it can be
//! tested without a key-value store.
//!
//! # Modules
//!
//! - [`types`] - Product records, type-safe IDs, prices and quantities
//! - [`basket`] - The `Cart` and `Wishlist` collections
//! - [`search`] - Title search over product lists

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod basket;
pub mod search;
pub mod types;

pub use basket::{Cart, CartEntry, Toggle, Wishlist, WishlistEntry};
pub use search::filter_products;
pub use types::*;
