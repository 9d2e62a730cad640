//! Cart and wishlist collections.
//!
//! Both collections are ordered by insertion and hold at most one entry per
//! [`ProductId`](crate::ProductId). They serialize as plain JSON arrays whose
//! elements are the product's fields spread inline (plus `quantity` for cart
//! entries), which is the layout persisted under the `cart` and `wishlist`
//! keys.

mod cart;
mod wishlist;

pub use cart::{Cart, CartEntry};
pub use wishlist::{Toggle, Wishlist, WishlistEntry};
