//! Core types for FoodCart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod geo;
pub mod id;
pub mod phone;
pub mod status;

pub use geo::Coordinates;
pub use id::*;
pub use phone::{PhoneError, PhoneNumber};
pub use status::*;
