//! The persisted place cache.
//!
//! Wraps [`PlaceRepository`] and a [`Geocode`] implementation into the one
//! entry point for address resolution. Repeated resolution of the same
//! address performs at most one external geocoding call over the
//! application's lifetime:
//!
//! - a hit returns the stored coordinates, including a stored `None` for an
//!   address the provider did not know (negative caching);
//! - a miss calls the provider and persists whatever came back, `None`
//!   included, via an upsert so concurrent first-resolves cannot fail on the
//!   unique address constraint (last writer wins);
//! - a provider *error* persists nothing, so the next request for that
//!   address tries again from scratch.

use sqlx::PgPool;
use thiserror::Error;

use foodcart_core::Coordinates;

use crate::db::{PlaceRepository, RepositoryError};
use crate::services::geocoder::{Geocode, GeocoderError};

/// Errors that can occur while resolving addresses.
#[derive(Debug, Error)]
pub enum PlaceError {
    /// Reading or writing the cache failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The geocoding provider call failed.
    #[error(transparent)]
    Geocoder(#[from] GeocoderError),
}

/// Address resolution through the persisted cache.
pub struct PlaceCache<'a, G> {
    pool: &'a PgPool,
    geocoder: &'a G,
}

impl<'a, G: Geocode + Sync> PlaceCache<'a, G> {
    /// Create a new place cache over a pool and a geocoder.
    #[must_use]
    pub const fn new(pool: &'a PgPool, geocoder: &'a G) -> Self {
        Self { pool, geocoder }
    }

    /// Resolve an address to coordinates, idempotently per address.
    ///
    /// Returns `Ok(None)` when the address is known to be unresolvable.
    ///
    /// # Errors
    ///
    /// Returns `PlaceError::Repository` on cache read/write failures and
    /// `PlaceError::Geocoder` on provider failures. Neither outcome is
    /// cached.
    pub async fn resolve(&self, address: &str) -> Result<Option<Coordinates>, PlaceError> {
        let repo = PlaceRepository::new(self.pool);

        if let Some(place) = repo.find_by_address(address).await? {
            tracing::debug!(address, hit = true, "Place cache lookup");
            return Ok(place.coordinates);
        }

        tracing::debug!(address, hit = false, "Place cache lookup");
        let coordinates = self.geocoder.fetch_coordinates(address).await?;
        let place = repo.upsert(address, coordinates).await?;

        Ok(place.coordinates)
    }

    /// Great-circle distance in kilometers between two addresses.
    ///
    /// Returns `Ok(None)` when either address does not resolve.
    ///
    /// # Errors
    ///
    /// Propagates [`PlaceError`] from either resolution.
    pub async fn distance_km(
        &self,
        address_a: &str,
        address_b: &str,
    ) -> Result<Option<f64>, PlaceError> {
        let Some(a) = self.resolve(address_a).await? else {
            return Ok(None);
        };
        let Some(b) = self.resolve(address_b).await? else {
            return Ok(None);
        };

        Ok(Some(a.distance_km(&b)))
    }
}
