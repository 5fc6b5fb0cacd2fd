//! Catalog domain types: restaurants, categories, products.

use rust_decimal::Decimal;

use foodcart_core::{ProductCategoryId, ProductId, RestaurantId};

/// A restaurant that fulfills orders.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Restaurant {
    /// Unique restaurant ID.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Street address; empty when not set. Used for delivery distance.
    pub address: String,
    /// Contact phone; empty when not set.
    pub contact_phone: String,
}

/// A product category (e.g. "Pizza", "Drinks").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCategory {
    /// Unique category ID.
    pub id: ProductCategoryId,
    /// Display name.
    pub name: String,
}

/// A sellable product.
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Category, if assigned.
    pub category: Option<ProductCategory>,
    /// Current price. Orders capture their own copy at submission time.
    pub price: Decimal,
    /// Image URL; empty when not set.
    pub image_url: String,
    /// Whether the product is a special offer.
    pub special_status: bool,
    /// Customer-facing description; empty when not set.
    pub description: String,
}
