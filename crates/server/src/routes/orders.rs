//! Order route handlers: placement, detail, and restaurant resolution.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use foodcart_core::{
    OrderId, OrderStatus, PaymentMethod, PhoneError, PhoneNumber, ProductId, RestaurantId,
};

use crate::db::{CatalogRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::models::{NewOrder, NewOrderItem, Order};
use crate::state::AppState;

/// Quantity bounds for a single order line.
const MIN_QUANTITY: i32 = 1;
const MAX_QUANTITY: i32 = 50;

/// Errors that reject an order submission before anything is written.
#[derive(Debug, Error)]
pub enum OrderValidationError {
    /// The product list is missing or empty.
    #[error("products: this list may not be empty")]
    EmptyProducts,

    /// A required field is missing or blank.
    #[error("{0}: this field is required")]
    MissingField(&'static str),

    /// The phone number does not parse.
    #[error("phonenumber: {0}")]
    InvalidPhone(#[from] PhoneError),

    /// A line's quantity is out of bounds.
    #[error("quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}, got {0}")]
    InvalidQuantity(i32),

    /// A line references a product that does not exist.
    #[error("unknown product: {0}")]
    UnknownProduct(i32),
}

/// Order submission payload.
///
/// All fields are optional at the serde layer so that validation can name
/// the missing field instead of failing deserialization wholesale.
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub address: Option<String>,
    pub phonenumber: Option<String>,
    pub products: Option<Vec<OrderLineRequest>>,
}

/// One submitted order line.
#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    /// Product id (the original API calls this field `product`).
    pub product: i32,
    pub quantity: i32,
}

/// Public fields of a created order, echoed back to the customer.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub firstname: String,
    pub lastname: String,
    pub address: String,
    pub phonenumber: PhoneNumber,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            firstname: order.firstname,
            lastname: order.lastname,
            address: order.address,
            phonenumber: order.phonenumber,
        }
    }
}

/// An order with its items and computed total.
#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    pub id: OrderId,
    pub firstname: String,
    pub lastname: String,
    pub address: String,
    pub phonenumber: PhoneNumber,
    pub status: OrderStatus,
    pub payment: PaymentMethod,
    pub comment: String,
    pub registered_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItemResponse>,
    pub total_price: Decimal,
}

/// One order line in API responses.
#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub product: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// A qualifying restaurant with its delivery distance.
#[derive(Debug, Serialize)]
pub struct RestaurantCandidateResponse {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub distance_km: Option<f64>,
}

/// Field-validated order submission, before product lookups.
#[derive(Debug)]
struct PendingOrder {
    firstname: String,
    lastname: String,
    address: String,
    phonenumber: PhoneNumber,
    lines: Vec<OrderLineRequest>,
}

/// Validate submission fields. No database access happens here.
fn validate(request: OrderRequest) -> std::result::Result<PendingOrder, OrderValidationError> {
    let firstname = require_field("firstname", request.firstname)?;
    let lastname = require_field("lastname", request.lastname)?;
    let address = require_field("address", request.address)?;

    let raw_phone = require_field("phonenumber", request.phonenumber)?;
    let phonenumber = PhoneNumber::parse(&raw_phone)?;

    let lines = request.products.unwrap_or_default();
    if lines.is_empty() {
        return Err(OrderValidationError::EmptyProducts);
    }
    for line in &lines {
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&line.quantity) {
            return Err(OrderValidationError::InvalidQuantity(line.quantity));
        }
    }

    Ok(PendingOrder {
        firstname,
        lastname,
        address,
        phonenumber,
        lines,
    })
}

fn require_field(
    name: &'static str,
    value: Option<String>,
) -> std::result::Result<String, OrderValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(OrderValidationError::MissingField(name)),
    }
}

/// Place an order.
///
/// Validates the submission fully, then writes the order and its items in
/// one transaction with each item's price copied from the product's current
/// price. Nothing is written on validation failure.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> Result<Json<OrderResponse>> {
    let pending = validate(request)?;

    // Capture current prices; any unknown product rejects the submission.
    let product_ids: Vec<ProductId> = pending
        .lines
        .iter()
        .map(|line| ProductId::new(line.product))
        .collect();
    let products = CatalogRepository::new(state.pool())
        .products_by_ids(&product_ids)
        .await?;
    let prices: HashMap<ProductId, Decimal> =
        products.into_iter().map(|p| (p.id, p.price)).collect();

    let mut items = Vec::with_capacity(pending.lines.len());
    for line in &pending.lines {
        let product_id = ProductId::new(line.product);
        let price = prices
            .get(&product_id)
            .copied()
            .ok_or(OrderValidationError::UnknownProduct(line.product))?;
        items.push(NewOrderItem {
            product_id,
            quantity: line.quantity,
            price,
        });
    }

    let new_order = NewOrder {
        firstname: pending.firstname,
        lastname: pending.lastname,
        address: pending.address,
        phonenumber: pending.phonenumber,
        items,
    };

    let order = OrderRepository::new(state.pool()).create(&new_order).await?;
    tracing::info!(order_id = %order.id, "Order registered");

    Ok(Json(OrderResponse::from(order)))
}

/// Fetch one order with its items and total price.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderDetailResponse>> {
    let order_id = OrderId::new(id);
    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    let items = repo.items(order_id).await?;
    let total_price = repo.total_price(order_id).await?;

    Ok(Json(OrderDetailResponse {
        id: order.id,
        firstname: order.firstname,
        lastname: order.lastname,
        address: order.address,
        phonenumber: order.phonenumber,
        status: order.status,
        payment: order.payment,
        comment: order.comment,
        registered_at: order.registered_at,
        called_at: order.called_at,
        delivered_at: order.delivered_at,
        items: items
            .into_iter()
            .map(|item| OrderItemResponse {
                product: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect(),
        total_price,
    }))
}

/// Qualifying restaurants for an order, ranked by delivery distance.
///
/// Restaurants whose address does not resolve stay in the list with
/// `distance_km: null`, after every ranked candidate.
#[instrument(skip(state))]
pub async fn restaurants(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<RestaurantCandidateResponse>>> {
    let order_id = OrderId::new(id);

    let order = OrderRepository::new(state.pool())
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let candidates = state.resolver().ranked_for_order(&order).await?;

    Ok(Json(
        candidates
            .into_iter()
            .map(|c| RestaurantCandidateResponse {
                id: c.restaurant.id,
                name: c.restaurant.name,
                address: c.restaurant.address,
                distance_km: c.distance_km,
            })
            .collect(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(products: Option<Vec<OrderLineRequest>>) -> OrderRequest {
        OrderRequest {
            firstname: Some("Ivan".to_string()),
            lastname: Some("Petrov".to_string()),
            address: Some("ул. Льва Толстого, 16".to_string()),
            phonenumber: Some("+7 999 123-45-67".to_string()),
            products,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_order() {
        let pending = validate(request(Some(vec![OrderLineRequest {
            product: 1,
            quantity: 2,
        }])))
        .unwrap();

        assert_eq!(pending.firstname, "Ivan");
        assert_eq!(pending.lines.len(), 1);
    }

    #[test]
    fn test_validate_rejects_empty_products() {
        assert!(matches!(
            validate(request(Some(vec![]))),
            Err(OrderValidationError::EmptyProducts)
        ));
    }

    #[test]
    fn test_validate_rejects_missing_products() {
        assert!(matches!(
            validate(request(None)),
            Err(OrderValidationError::EmptyProducts)
        ));
    }

    #[test]
    fn test_validate_rejects_blank_required_field() {
        let mut req = request(Some(vec![OrderLineRequest {
            product: 1,
            quantity: 1,
        }]));
        req.firstname = Some("   ".to_string());

        assert!(matches!(
            validate(req),
            Err(OrderValidationError::MissingField("firstname"))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_address() {
        let mut req = request(Some(vec![OrderLineRequest {
            product: 1,
            quantity: 1,
        }]));
        req.address = None;

        assert!(matches!(
            validate(req),
            Err(OrderValidationError::MissingField("address"))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_phone() {
        let mut req = request(Some(vec![OrderLineRequest {
            product: 1,
            quantity: 1,
        }]));
        req.phonenumber = Some("not a phone".to_string());

        assert!(matches!(
            validate(req),
            Err(OrderValidationError::InvalidPhone(_))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_quantity() {
        for quantity in [0, -1, 51] {
            let req = request(Some(vec![OrderLineRequest {
                product: 1,
                quantity,
            }]));
            assert!(
                matches!(
                    validate(req),
                    Err(OrderValidationError::InvalidQuantity(q)) if q == quantity
                ),
                "quantity {quantity} should be rejected"
            );
        }
    }

    #[test]
    fn test_order_request_deserializes_original_payload_shape() {
        let json = r#"{
            "firstname": "Ivan",
            "lastname": "Petrov",
            "address": "ул. Льва Толстого, 16",
            "phonenumber": "+7 999 123-45-67",
            "products": [{"product": 1, "quantity": 2}, {"product": 3, "quantity": 1}]
        }"#;

        let request: OrderRequest = serde_json::from_str(json).unwrap();
        let pending = validate(request).unwrap();
        assert_eq!(pending.lines.len(), 2);
        assert_eq!(pending.lines.first().unwrap().product, 1);
    }
}
