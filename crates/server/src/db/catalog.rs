//! Catalog repository: restaurants, products, and menu coverage.

use rust_decimal::Decimal;
use sqlx::PgPool;

use foodcart_core::{ProductCategoryId, ProductId};

use super::RepositoryError;
use crate::models::{Product, ProductCategory, Restaurant};

/// Raw product row with its (optional) category joined in.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    image_url: String,
    special_status: bool,
    description: String,
    category_id: Option<i32>,
    category_name: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(ProductCategory {
                id: ProductCategoryId::new(id),
                name,
            }),
            _ => None,
        };

        Self {
            id: ProductId::new(row.id),
            name: row.name,
            category,
            price: row.price,
            image_url: row.image_url,
            special_status: row.special_status,
            description: row.description,
        }
    }
}

/// One `(product, restaurant)` menu pairing, used by the resolver to build
/// per-product coverage sets.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MenuCoverage {
    /// The covered product.
    pub product_id: ProductId,
    /// The restaurant stocking it.
    #[sqlx(flatten)]
    pub restaurant: Restaurant,
}

/// Repository for catalog database operations.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product present on at least one restaurant's menu with
    /// `availability = true`, with categories joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_available_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT DISTINCT p.id, p.name, p.price, p.image_url, p.special_status, p.description,
                   c.id AS category_id, c.name AS category_name
            FROM products p
            LEFT JOIN product_categories c ON c.id = p.category_id
            JOIN restaurant_menu_items mi ON mi.product_id = p.id AND mi.availability
            ORDER BY p.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Fetch products by id, in no particular order.
    ///
    /// Missing ids are simply absent from the result; callers that need
    /// every id to exist must check the returned set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT p.id, p.name, p.price, p.image_url, p.special_status, p.description,
                   c.id AS category_id, c.name AS category_name
            FROM products p
            LEFT JOIN product_categories c ON c.id = p.category_id
            WHERE p.id = ANY($1)
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Fetch the menu coverage for a set of products: every
    /// `(product, restaurant)` pairing where the restaurant's menu lists the
    /// product.
    ///
    /// When `require_availability` is true, menu items with
    /// `availability = false` do not count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn menu_coverage(
        &self,
        product_ids: &[ProductId],
        require_availability: bool,
    ) -> Result<Vec<MenuCoverage>, RepositoryError> {
        let raw_ids: Vec<i32> = product_ids.iter().map(|id| id.as_i32()).collect();

        let rows = sqlx::query_as::<_, MenuCoverage>(
            r"
            SELECT mi.product_id, r.id, r.name, r.address, r.contact_phone
            FROM restaurant_menu_items mi
            JOIN restaurants r ON r.id = mi.restaurant_id
            WHERE mi.product_id = ANY($1)
              AND ($2 = FALSE OR mi.availability)
            ORDER BY r.id
            ",
        )
        .bind(&raw_ids)
        .bind(require_availability)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
