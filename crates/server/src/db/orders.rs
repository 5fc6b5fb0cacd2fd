//! Order repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use foodcart_core::OrderId;

use super::RepositoryError;
use crate::models::{NewOrder, Order, OrderItem};

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a validated order and all of its line items in one
    /// transaction. Either everything is written or nothing is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; the
    /// transaction is rolled back and no partial order remains.
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (firstname, lastname, address, phonenumber)
            VALUES ($1, $2, $3, $4)
            RETURNING id, firstname, lastname, address, phonenumber,
                      status, payment, comment,
                      registered_at, called_at, delivered_at
            ",
        )
        .bind(&new_order.firstname)
        .bind(&new_order.lastname)
        .bind(&new_order.address)
        .bind(&new_order.phonenumber)
        .fetch_one(&mut *tx)
        .await?;

        for item in &new_order.items {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Fetch one order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            SELECT id, firstname, lastname, address, phonenumber,
                   status, payment, comment,
                   registered_at, called_at, delivered_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Fetch an order's line items, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT id, order_id, product_id, quantity, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Compute an order's total price (Σ item price × quantity) in SQL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_price(&self, order_id: OrderId) -> Result<Decimal, RepositoryError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r"
            SELECT COALESCE(SUM(price * quantity), 0)
            FROM order_items
            WHERE order_id = $1
            ",
        )
        .bind(order_id)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }
}
