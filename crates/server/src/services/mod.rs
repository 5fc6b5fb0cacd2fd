//! Service layer: the geocoding client, the persisted place cache, and the
//! order-restaurant resolver.

pub mod geocoder;
pub mod places;
pub mod resolver;

pub use geocoder::{Geocode, GeocoderClient, GeocoderError};
pub use places::{PlaceCache, PlaceError};
pub use resolver::{OrderResolver, RestaurantCandidate};
