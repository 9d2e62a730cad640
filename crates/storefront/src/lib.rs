//! Tray storefront library.
//!
//! Holds everything the `tray-storefront` server and the `tray` CLI share:
//! key-value storage, the Basket Store, the catalog client, configuration
//! and the HTTP screens.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod basket;
pub mod catalog;
pub mod config;
pub mod error;
mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;
