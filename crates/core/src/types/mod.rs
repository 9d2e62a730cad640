//! Core types for Tray.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod quantity;

pub use id::ProductId;
pub use price::Price;
pub use product::{Product, Rating};
pub use quantity::{Quantity, QuantityError};
