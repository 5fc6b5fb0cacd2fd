//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use foodcart_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, PhoneNumber, ProductId};

/// A customer order.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer first name.
    pub firstname: String,
    /// Customer last name.
    pub lastname: String,
    /// Delivery address.
    pub address: String,
    /// Customer contact phone.
    pub phonenumber: PhoneNumber,
    /// Processing status.
    pub status: OrderStatus,
    /// Payment method.
    pub payment: PaymentMethod,
    /// Manager comment; empty when not set.
    pub comment: String,
    /// When the order was registered.
    pub registered_at: DateTime<Utc>,
    /// When the customer was called, if they were.
    pub called_at: Option<DateTime<Utc>>,
    /// When the order was delivered, if it was.
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A line in an order.
///
/// `price` is the per-unit price captured at order time, decoupled from the
/// product's current price.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItem {
    /// Unique line ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Ordered product.
    pub product_id: ProductId,
    /// Units ordered (1..=50).
    pub quantity: i32,
    /// Per-unit price at order time.
    pub price: Decimal,
}

/// A validated order ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub firstname: String,
    pub lastname: String,
    pub address: String,
    pub phonenumber: PhoneNumber,
    pub items: Vec<NewOrderItem>,
}

/// A validated order line ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    /// Per-unit price captured from the product at submission time.
    pub price: Decimal,
}
