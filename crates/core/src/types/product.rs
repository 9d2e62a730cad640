//! Catalog product records.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as returned by the catalog API.
///
/// Only `id` carries meaning for the basket; every other field is passed
/// through so persisted entries keep whatever the catalog sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Absolute URL of the product image.
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Aggregate review score reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

impl Product {
    /// Case-insensitive substring match against the title.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn title_contains(&self, needle: &str) -> bool {
        needle.is_empty() || self.title.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_catalog_record() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(10995));
        assert_eq!(product.category.as_deref(), Some("men's clothing"));
        assert_eq!(product.rating.unwrap().count, 120);
    }

    #[test]
    fn test_optional_fields_may_be_missing() {
        let json = r#"{"id": 2, "title": "Mug", "price": 5, "image": "https://x/y.png"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.description.is_empty());
        assert!(product.category.is_none());

        let out = serde_json::to_value(&product).unwrap();
        assert!(out.get("category").is_none());
        assert!(out.get("rating").is_none());
    }

    #[test]
    fn test_title_contains() {
        let json = r#"{"id": 3, "title": "Mens Cotton Jacket", "price": 55.99, "image": ""}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.title_contains("cotton"));
        assert!(product.title_contains(""));
        assert!(!product.title_contains("Cotton"));
        assert!(!product.title_contains("shirt"));
    }
}
