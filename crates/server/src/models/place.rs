//! Cached geocoding results.

use chrono::{DateTime, Utc};

use foodcart_core::{Coordinates, PlaceId};

/// A cached geocoding result for one address string.
///
/// `coordinates` is `None` when the geocoding provider returned no results
/// for the address; the row still exists so the address is not re-queried.
#[derive(Debug, Clone)]
pub struct Place {
    /// Unique place ID.
    pub id: PlaceId,
    /// The address as it was first requested (unique key).
    pub address: String,
    /// Resolved coordinates, or `None` for a recorded failed geocode.
    pub coordinates: Option<Coordinates>,
    /// When this entry was last written.
    pub updated_at: DateTime<Utc>,
}
