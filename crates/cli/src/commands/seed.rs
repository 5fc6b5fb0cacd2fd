//! Seed the catalog from a YAML file.
//!
//! Reads categories, products, restaurants, and their menus from a YAML
//! configuration, validates the cross-references, and inserts everything in
//! one transaction.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{error, info};

/// The YAML catalog shape.
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub products: Vec<ProductConfig>,
    #[serde(default)]
    pub restaurants: Vec<RestaurantConfig>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductConfig {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub special_status: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct RestaurantConfig {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_phone: String,
    /// Product names on this restaurant's menu.
    #[serde(default)]
    pub menu: Vec<String>,
}

/// Validate cross-references inside a catalog configuration.
///
/// Returns a list of human-readable problems; empty means valid.
#[must_use]
pub fn validate_config(config: &CatalogConfig) -> Vec<String> {
    let mut errors = Vec::new();

    let category_names: Vec<&str> = config.categories.iter().map(|c| c.name.as_str()).collect();
    let product_names: Vec<&str> = config.products.iter().map(|p| p.name.as_str()).collect();

    for product in &config.products {
        if product.price < Decimal::ZERO {
            errors.push(format!("product {:?} has a negative price", product.name));
        }
        if let Some(category) = &product.category
            && !category_names.contains(&category.as_str())
        {
            errors.push(format!(
                "product {:?} references unknown category {:?}",
                product.name, category
            ));
        }
    }

    for restaurant in &config.restaurants {
        for item in &restaurant.menu {
            if !product_names.contains(&item.as_str()) {
                errors.push(format!(
                    "restaurant {:?} menu references unknown product {:?}",
                    restaurant.name, item
                ));
            }
        }
    }

    errors
}

/// Seed the catalog from a YAML file.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML catalog file
/// * `replace` - If true, clear the existing catalog first
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file cannot be
/// read or validated, or database operations fail.
pub async fn catalog(file_path: &str, replace: bool) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("FOODCART_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| "FOODCART_DATABASE_URL not set")?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let config: CatalogConfig = serde_yaml::from_str(&content)?;

    info!(
        categories = config.categories.len(),
        products = config.products.len(),
        restaurants = config.restaurants.len(),
        "Parsed catalog"
    );

    let errors = validate_config(&config);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    info!("Catalog validated successfully");

    let pool = PgPool::connect(&database_url).await?;
    info!("Connected to database");

    let mut tx = pool.begin().await?;

    if replace {
        info!("Clearing existing catalog");
        sqlx::query("TRUNCATE restaurant_menu_items, restaurants, products, product_categories RESTART IDENTITY CASCADE")
            .execute(&mut *tx)
            .await?;
    }

    let inserted = insert_catalog(&mut tx, &config).await?;
    tx.commit().await?;

    info!("Seeding complete!");
    info!("  Categories inserted: {}", inserted.categories);
    info!("  Products inserted: {}", inserted.products);
    info!("  Restaurants inserted: {}", inserted.restaurants);
    info!("  Menu items inserted: {}", inserted.menu_items);

    Ok(())
}

/// Counts of inserted rows, for the summary log.
#[derive(Debug, Default)]
struct InsertSummary {
    categories: usize,
    products: usize,
    restaurants: usize,
    menu_items: usize,
}

async fn insert_catalog(
    tx: &mut Transaction<'_, Postgres>,
    config: &CatalogConfig,
) -> Result<InsertSummary, sqlx::Error> {
    let mut summary = InsertSummary::default();

    let mut category_ids: HashMap<&str, i32> = HashMap::new();
    for category in &config.categories {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO product_categories (name) VALUES ($1) RETURNING id",
        )
        .bind(&category.name)
        .fetch_one(&mut **tx)
        .await?;
        category_ids.insert(category.name.as_str(), id);
        summary.categories += 1;
    }

    let mut product_ids: HashMap<&str, i32> = HashMap::new();
    for product in &config.products {
        let category_id = product
            .category
            .as_deref()
            .and_then(|name| category_ids.get(name).copied());
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO products (name, category_id, price, image_url, special_status, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(&product.name)
        .bind(category_id)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.special_status)
        .bind(&product.description)
        .fetch_one(&mut **tx)
        .await?;
        product_ids.insert(product.name.as_str(), id);
        summary.products += 1;
    }

    for restaurant in &config.restaurants {
        let restaurant_id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO restaurants (name, address, contact_phone)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(&restaurant.name)
        .bind(&restaurant.address)
        .bind(&restaurant.contact_phone)
        .fetch_one(&mut **tx)
        .await?;
        summary.restaurants += 1;

        for item in &restaurant.menu {
            // validate_config guarantees the product exists
            if let Some(product_id) = product_ids.get(item.as_str()) {
                sqlx::query(
                    r"
                    INSERT INTO restaurant_menu_items (restaurant_id, product_id)
                    VALUES ($1, $2)
                    ON CONFLICT (restaurant_id, product_id) DO NOTHING
                    ",
                )
                .bind(restaurant_id)
                .bind(product_id)
                .execute(&mut **tx)
                .await?;
                summary.menu_items += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
categories:
  - name: Pizza
products:
  - name: Margherita
    category: Pizza
    price: '899.00'
restaurants:
  - name: Sunrise
    address: Lenina st, 1
    menu: [Margherita]
";

    #[test]
    fn test_sample_config_parses_and_validates() {
        let config: CatalogConfig = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_unknown_category_is_reported() {
        let config: CatalogConfig = serde_yaml::from_str(
            r"
products:
  - name: Margherita
    category: Pizza
    price: '899.00'
",
        )
        .unwrap();

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors.first().unwrap().contains("unknown category"));
    }

    #[test]
    fn test_unknown_menu_product_is_reported() {
        let config: CatalogConfig = serde_yaml::from_str(
            r"
restaurants:
  - name: Sunrise
    menu: [Ghost Burger]
",
        )
        .unwrap();

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors.first().unwrap().contains("unknown product"));
    }

    #[test]
    fn test_negative_price_is_reported() {
        let config: CatalogConfig = serde_yaml::from_str(
            r"
products:
  - name: Margherita
    price: '-1.00'
",
        )
        .unwrap();

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors.first().unwrap().contains("negative price"));
    }
}
