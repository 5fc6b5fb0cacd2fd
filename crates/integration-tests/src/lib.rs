//! Integration test support for FoodCart.
//!
//! The actual tests live in `tests/` and are `#[ignore]`d by default
//! because they need infrastructure:
//!
//! - `products_api.rs` / `orders_api.rs` drive the HTTP API of a running
//!   server (`FOODCART_BASE_URL`, default `http://localhost:3000`) seeded
//!   with the demo catalog.
//! - `place_cache.rs` exercises the place cache against a real database
//!   (`FOODCART_DATABASE_URL`) with stub geocoders.
