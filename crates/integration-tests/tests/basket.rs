//! Basket Store over the file-backed store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use tray_core::{Price, Product, ProductId, Quantity, Wishlist};
use tray_storefront::basket::{BasketEvent, BasketStore, Notice};
use tray_storefront::storage::{FileStore, KeyValueStore, keys};

fn product(id: i32, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Price::from_cents(cents),
        image: format!("https://img.example/{id}.png"),
        description: String::new(),
        category: None,
        rating: None,
    }
}

fn file_store() -> (BasketStore, FileStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let files = FileStore::new(dir.path());
    (BasketStore::new(Arc::new(files.clone())), files, dir)
}

#[tokio::test]
async fn test_cart_scenario_survives_restart() {
    let (store, _, dir) = file_store();

    let update = store.add_to_cart(&product(1, 999)).await.unwrap();
    assert_eq!(update.notice, Some(Notice::CartAdded));
    assert_eq!(update.value.entries()[0].quantity, Quantity::ONE);

    let cart = store
        .update_quantity(&update.value, ProductId::new(1), 1)
        .await
        .unwrap()
        .value;
    assert_eq!(cart.entries()[0].quantity.get(), 2);

    let cart = store
        .update_quantity(&cart, ProductId::new(1), -5)
        .await
        .unwrap()
        .value;
    assert_eq!(cart.entries()[0].quantity.get(), 1);

    // A second store over the same directory sees the same cart.
    let reopened = BasketStore::new(Arc::new(FileStore::new(dir.path())));
    let cart = reopened.load_cart().await;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total_price(), Price::from_cents(999));

    let cart = reopened
        .remove_from_cart(&cart, ProductId::new(1))
        .await
        .unwrap()
        .value;
    assert!(cart.is_empty());
    assert!(store.load_cart().await.is_empty());
}

#[tokio::test]
async fn test_persisted_layout() {
    let (store, files, dir) = file_store();
    store.add_to_cart(&product(2, 2230)).await.unwrap();
    store.add_to_cart(&product(2, 2230)).await.unwrap();
    store
        .toggle_wishlist(&Wishlist::new(), &product(3, 3999))
        .await
        .unwrap();

    assert!(dir.path().join("cart.json").exists());
    assert!(dir.path().join("wishlist.json").exists());

    let cart: serde_json::Value =
        serde_json::from_str(&files.get(keys::CART).await.unwrap().unwrap()).unwrap();
    assert_eq!(cart[0]["id"], 2);
    assert_eq!(cart[0]["price"], 22.3);
    assert_eq!(cart[0]["quantity"], 2);
    assert_eq!(cart[0]["title"], "Product 2");

    let wishlist: serde_json::Value =
        serde_json::from_str(&files.get(keys::WISHLIST).await.unwrap().unwrap()).unwrap();
    assert_eq!(wishlist[0]["id"], 3);
    assert!(wishlist[0].get("quantity").is_none());
}

#[tokio::test]
async fn test_corrupt_file_loads_empty() {
    let (store, files, _dir) = file_store();
    files.set(keys::CART, "{not json").await.unwrap();
    files.set(keys::WISHLIST, "[{\"id\": \"x\"}]").await.unwrap();

    assert!(store.load_cart().await.is_empty());
    assert!(store.load_wishlist().await.is_empty());

    // The next write replaces the corrupt blob.
    store.add_to_cart(&product(1, 100)).await.unwrap();
    assert_eq!(store.load_cart().await.len(), 1);
}

#[tokio::test]
async fn test_wishlist_toggle_and_events() {
    let (store, _, _dir) = file_store();
    let mut events = store.subscribe();

    let wishlist = store
        .toggle_wishlist(&Wishlist::new(), &product(4, 100))
        .await
        .unwrap()
        .value;
    assert!(wishlist.contains(ProductId::new(4)));

    let update = store.toggle_wishlist(&wishlist, &product(4, 100)).await.unwrap();
    assert_eq!(update.notice, Some(Notice::WishlistRemoved));
    assert!(update.value.is_empty());

    match events.recv().await.unwrap() {
        BasketEvent::WishlistChanged(w) => assert_eq!(w.len(), 1),
        BasketEvent::CartChanged(_) => panic!("expected wishlist event"),
    }
    match events.recv().await.unwrap() {
        BasketEvent::WishlistChanged(w) => assert!(w.is_empty()),
        BasketEvent::CartChanged(_) => panic!("expected wishlist event"),
    }
}
