//! Product listing route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use foodcart_core::{ProductCategoryId, ProductId};

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::models::Product;
use crate::state::AppState;

/// A product category in API responses.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: ProductCategoryId,
    pub name: String,
}

/// A product in API responses.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub special_status: bool,
    pub description: String,
    pub category: Option<CategoryResponse>,
    pub image: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            special_status: product.special_status,
            description: product.description,
            category: product.category.map(|c| CategoryResponse {
                id: c.id,
                name: c.name,
            }),
            image: product.image_url,
        }
    }
}

/// List every product present on at least one menu with availability.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = CatalogRepository::new(state.pool())
        .list_available_products()
        .await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::ProductCategory;

    #[test]
    fn test_product_response_shape() {
        let product = Product {
            id: ProductId::new(1),
            name: "Pizza Margherita".to_string(),
            category: Some(ProductCategory {
                id: ProductCategoryId::new(2),
                name: "Pizza".to_string(),
            }),
            price: Decimal::new(89_900, 2),
            image_url: "/media/margherita.jpg".to_string(),
            special_status: false,
            description: "Tomato, mozzarella, basil".to_string(),
        };

        let json = serde_json::to_value(ProductResponse::from(product)).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Pizza Margherita");
        assert_eq!(json["price"], "899.00");
        assert_eq!(json["category"]["id"], 2);
        assert_eq!(json["category"]["name"], "Pizza");
        assert_eq!(json["image"], "/media/margherita.jpg");
        assert_eq!(json["special_status"], false);
    }

    #[test]
    fn test_product_response_without_category() {
        let product = Product {
            id: ProductId::new(1),
            name: "Cola".to_string(),
            category: None,
            price: Decimal::new(9_900, 2),
            image_url: String::new(),
            special_status: true,
            description: String::new(),
        };

        let json = serde_json::to_value(ProductResponse::from(product)).unwrap();
        assert!(json["category"].is_null());
        assert_eq!(json["special_status"], true);
    }
}
