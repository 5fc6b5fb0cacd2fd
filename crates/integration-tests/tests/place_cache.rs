//! Database-backed tests for the place cache.
//!
//! These tests require a `PostgreSQL` database with migrations applied,
//! reachable via `FOODCART_DATABASE_URL` (or `DATABASE_URL`). They use stub
//! geocoders, so no provider credentials are needed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::PgPool;

use foodcart_core::Coordinates;
use foodcart_server::services::geocoder::{Geocode, GeocoderError};
use foodcart_server::services::places::PlaceCache;

/// A geocoder stub that counts calls and returns a fixed answer.
struct CountingGeocoder {
    calls: AtomicUsize,
    answer: Option<Coordinates>,
}

impl CountingGeocoder {
    fn new(answer: Option<Coordinates>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            answer,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocode for CountingGeocoder {
    async fn fetch_coordinates(
        &self,
        _address: &str,
    ) -> Result<Option<Coordinates>, GeocoderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

async fn connect() -> PgPool {
    let database_url = std::env::var("FOODCART_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("FOODCART_DATABASE_URL must be set");
    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// A fresh address per test run so previous runs don't satisfy the lookup.
fn unique_address(label: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("test: {label} {nanos}")
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_resolve_twice_calls_geocoder_once() {
    let pool = connect().await;
    let geocoder = CountingGeocoder::new(Some(Coordinates::new(55.75, 37.62)));
    let cache = PlaceCache::new(&pool, &geocoder);
    let address = unique_address("idempotence");

    let first = cache.resolve(&address).await.expect("first resolve");
    let second = cache.resolve(&address).await.expect("second resolve");

    assert_eq!(geocoder.calls(), 1, "second resolve must hit the cache");
    assert_eq!(first, second);
    assert!(first.is_some());
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_failed_geocode_is_negative_cached() {
    let pool = connect().await;
    let geocoder = CountingGeocoder::new(None);
    let cache = PlaceCache::new(&pool, &geocoder);
    let address = unique_address("negative");

    assert!(cache.resolve(&address).await.expect("first resolve").is_none());
    assert!(cache.resolve(&address).await.expect("second resolve").is_none());

    assert_eq!(
        geocoder.calls(),
        1,
        "an unresolvable address must not be re-queried"
    );
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_distance_between_resolved_addresses() {
    let pool = connect().await;
    let geocoder = CountingGeocoder::new(Some(Coordinates::new(55.75, 37.62)));
    let cache = PlaceCache::new(&pool, &geocoder);
    let address = unique_address("distance-self");

    // Same address on both sides: same cached coordinates, zero distance
    let km = cache
        .distance_km(&address, &address)
        .await
        .expect("distance")
        .expect("both sides resolve");
    assert!(km.abs() < 1e-9);
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_distance_is_absent_when_either_address_fails() {
    let pool = connect().await;

    // First, record an unresolvable address
    let bad_geocoder = CountingGeocoder::new(None);
    let bad_address = unique_address("distance-bad");
    PlaceCache::new(&pool, &bad_geocoder)
        .resolve(&bad_address)
        .await
        .expect("resolve");

    // Any pairing with it yields no distance, regardless of the other side
    let good_geocoder = CountingGeocoder::new(Some(Coordinates::new(55.75, 37.62)));
    let cache = PlaceCache::new(&pool, &good_geocoder);
    let good_address = unique_address("distance-good");

    let km = cache
        .distance_km(&bad_address, &good_address)
        .await
        .expect("distance");
    assert!(km.is_none());
}
