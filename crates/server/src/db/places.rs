//! Place repository: the persisted geocoding cache.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use foodcart_core::{Coordinates, PlaceId};

use super::RepositoryError;
use crate::models::Place;

/// Raw `places` row; latitude/longitude are paired into [`Coordinates`]
/// during conversion.
#[derive(Debug, sqlx::FromRow)]
struct PlaceRow {
    id: i32,
    address: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    updated_at: DateTime<Utc>,
}

impl PlaceRow {
    fn into_place(self) -> Result<Place, RepositoryError> {
        let coordinates = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            (None, None) => None,
            _ => {
                return Err(RepositoryError::DataCorruption(format!(
                    "place {} has a one-sided coordinate pair",
                    self.address
                )));
            }
        };

        Ok(Place {
            id: PlaceId::new(self.id),
            address: self.address,
            coordinates,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for the persisted geocoding cache.
pub struct PlaceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PlaceRepository<'a> {
    /// Create a new place repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a cached geocode result by address.
    ///
    /// Returns `Ok(None)` when the address has never been geocoded. A
    /// returned `Place` with `coordinates: None` is a recorded failed
    /// geocode and must not trigger a re-query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` on a one-sided coordinate pair.
    pub async fn find_by_address(&self, address: &str) -> Result<Option<Place>, RepositoryError> {
        let row = sqlx::query_as::<_, PlaceRow>(
            r"
            SELECT id, address, latitude, longitude, updated_at
            FROM places
            WHERE address = $1
            ",
        )
        .bind(address)
        .fetch_optional(self.pool)
        .await?;

        row.map(PlaceRow::into_place).transpose()
    }

    /// Insert or refresh the cached geocode result for an address.
    ///
    /// Two concurrent first-resolves of the same address both succeed; the
    /// last writer wins. `updated_at` is stamped on every write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    pub async fn upsert(
        &self,
        address: &str,
        coordinates: Option<Coordinates>,
    ) -> Result<Place, RepositoryError> {
        let row = sqlx::query_as::<_, PlaceRow>(
            r"
            INSERT INTO places (address, latitude, longitude)
            VALUES ($1, $2, $3)
            ON CONFLICT (address) DO UPDATE
            SET latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                updated_at = now()
            RETURNING id, address, latitude, longitude, updated_at
            ",
        )
        .bind(address)
        .bind(coordinates.map(|c| c.latitude))
        .bind(coordinates.map(|c| c.longitude))
        .fetch_one(self.pool)
        .await?;

        row.into_place()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(latitude: Option<f64>, longitude: Option<f64>) -> PlaceRow {
        PlaceRow {
            id: 1,
            address: "ул. Льва Толстого, 16".to_string(),
            latitude,
            longitude,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_with_both_coordinates() {
        let place = row(Some(55.73), Some(37.58)).into_place().unwrap();
        let coords = place.coordinates.unwrap();
        assert!((coords.latitude - 55.73).abs() < f64::EPSILON);
        assert!((coords.longitude - 37.58).abs() < f64::EPSILON);
    }

    #[test]
    fn test_row_with_no_coordinates_is_negative_cache() {
        let place = row(None, None).into_place().unwrap();
        assert!(place.coordinates.is_none());
    }

    #[test]
    fn test_row_with_one_sided_pair_is_corruption() {
        assert!(matches!(
            row(Some(55.73), None).into_place(),
            Err(RepositoryError::DataCorruption(_))
        ));
        assert!(matches!(
            row(None, Some(37.58)).into_place(),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
