//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::geocoder::{GeocoderClient, GeocoderError};
use crate::services::places::PlaceCache;
use crate::services::resolver::OrderResolver;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    geocoder: GeocoderClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the geocoding client cannot be built.
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, GeocoderError> {
        let geocoder = GeocoderClient::new(&config.geocoder)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                geocoder,
            }),
        })
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the geocoding client.
    #[must_use]
    pub fn geocoder(&self) -> &GeocoderClient {
        &self.inner.geocoder
    }

    /// Build the place cache service over this state's pool and geocoder.
    #[must_use]
    pub fn places(&self) -> PlaceCache<'_, GeocoderClient> {
        PlaceCache::new(self.pool(), self.geocoder())
    }

    /// Build the order-restaurant resolver over this state.
    #[must_use]
    pub fn resolver(&self) -> OrderResolver<'_, GeocoderClient> {
        OrderResolver::new(self.pool(), self.geocoder(), self.config().menu)
    }
}
