//! Conversions from product API responses to domain products.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use markethub_core::ProductId;

use super::CatalogError;
use crate::models::Product;

/// A product as returned by the product listing endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct ApiProduct {
    id: i32,
    title: String,
    /// Kept as the raw JSON number so no precision is lost through `f64`.
    price: serde_json::Number,
    #[serde(default)]
    description: String,
    category: String,
    image: String,
    #[serde(default)]
    rating: ApiRating,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ApiRating {
    rate: f32,
    count: u32,
}

/// Convert an API product into the catalog's product type.
pub(super) fn convert_product(api: ApiProduct) -> Result<Product, CatalogError> {
    let price = Decimal::from_str(&api.price.to_string()).map_err(|e| {
        CatalogError::InvalidProduct(format!("product {} has price {}: {e}", api.id, api.price))
    })?;

    Ok(Product {
        id: ProductId::new(api.id),
        title: api.title,
        price,
        image: api.image,
        category: api.category,
        rating: api.rating.rate,
        rating_count: api.rating.count,
        description: api.description,
    })
}

/// Parse a listing response body.
pub(super) fn convert_product_list(body: &str) -> Result<Vec<Product>, CatalogError> {
    let items: Vec<ApiProduct> = serde_json::from_str(body)?;
    items.into_iter().map(convert_product).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LISTING: &str = r#"[
        {
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 22.3,
            "description": "Slim-fitting style.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        }
    ]"#;

    #[test]
    fn test_convert_listing() {
        let products = convert_product_list(LISTING).unwrap();
        assert_eq!(products.len(), 2);

        let first = products.first().unwrap();
        assert_eq!(first.id, ProductId::new(1));
        assert_eq!(first.price, Decimal::new(10_995, 2));
        assert_eq!(first.category, "men's clothing");
        assert!((first.rating - 3.9).abs() < f32::EPSILON);
        assert_eq!(first.rating_count, 120);

        assert_eq!(products.get(1).unwrap().price, Decimal::new(223, 1));
    }

    #[test]
    fn test_integer_price() {
        let body = r#"[{"id": 3, "title": "t", "price": 56, "category": "c", "image": "i"}]"#;
        let products = convert_product_list(body).unwrap();
        assert_eq!(products.first().unwrap().price, Decimal::new(56, 0));
        assert_eq!(products.first().unwrap().rating_count, 0);
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            convert_product_list("{\"error\": true}"),
            Err(CatalogError::Parse(_))
        ));
    }
}
