//! HTTP route handlers for the ordering API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (verifies DB)
//!
//! # Ordering API
//! GET  /api/products                - Products on at least one menu, available
//! POST /api/order                   - Place an order
//! GET  /api/orders/{id}             - Order with items and total price
//! GET  /api/orders/{id}/restaurants - Qualifying restaurants ranked by distance
//! ```

pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the ordering API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/order", post(orders::create))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/restaurants", get(orders::restaurants))
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}
