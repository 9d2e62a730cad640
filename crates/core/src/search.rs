//! Title search over catalog product lists.

use crate::types::Product;

/// Products whose title contains `query`, ignoring case.
///
/// An empty query matches everything. Source order is preserved.
#[must_use]
pub fn filter_products(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|product| product.title_contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Price, ProductId};

    fn product(id: i32, title: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(100),
            image: String::new(),
            description: String::new(),
            category: None,
            rating: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Mens Casual Premium Slim Fit T-Shirts"),
            product(2, "Mens Cotton Jacket"),
            product(3, "DANVOUY Womens T Shirt Casual Cotton Short"),
            product(4, "Solid Gold Petite Micropave"),
        ]
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let products = catalog();
        assert_eq!(filter_products(&products, ""), products);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let ids: Vec<_> = filter_products(&catalog(), "SHIRT")
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_no_match() {
        assert!(filter_products(&catalog(), "laptop").is_empty());
    }

    #[test]
    fn test_preserves_source_order() {
        let ids: Vec<_> = filter_products(&catalog(), "cotton")
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
