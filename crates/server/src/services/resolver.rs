//! The order-restaurant resolver.
//!
//! Computes which restaurants can fulfill an order (every line item must be
//! on the restaurant's menu) and ranks them by delivery distance.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use sqlx::PgPool;

use foodcart_core::{ProductId, RestaurantId};

use crate::config::MenuPolicy;
use crate::db::catalog::MenuCoverage;
use crate::db::{CatalogRepository, OrderRepository, RepositoryError};
use crate::models::{Order, Restaurant};
use crate::services::geocoder::Geocode;
use crate::services::places::{PlaceCache, PlaceError};

/// A qualifying restaurant with its delivery distance, when rankable.
#[derive(Debug, Clone)]
pub struct RestaurantCandidate {
    /// The restaurant.
    pub restaurant: Restaurant,
    /// Restaurant-to-delivery-address distance; `None` when either address
    /// does not resolve. Unrankable candidates still qualify.
    pub distance_km: Option<f64>,
}

/// Resolves orders to the restaurants able to fulfill them.
pub struct OrderResolver<'a, G> {
    pool: &'a PgPool,
    geocoder: &'a G,
    policy: MenuPolicy,
}

impl<'a, G: Geocode + Sync> OrderResolver<'a, G> {
    /// Create a new resolver.
    #[must_use]
    pub const fn new(pool: &'a PgPool, geocoder: &'a G, policy: MenuPolicy) -> Self {
        Self {
            pool,
            geocoder,
            policy,
        }
    }

    /// The set of restaurants stocking every product in `product_ids`.
    ///
    /// An empty `product_ids` resolves to the empty set, as does any product
    /// list containing a product no restaurant carries. The result is sorted
    /// by restaurant id for deterministic output.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the coverage query fails.
    pub async fn restaurants_for(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<Restaurant>, RepositoryError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let coverage = CatalogRepository::new(self.pool)
            .menu_coverage(product_ids, self.policy.require_availability)
            .await?;

        let qualifying = qualifying_restaurants(product_ids, &coverage);

        let mut restaurants: Vec<Restaurant> = coverage
            .into_iter()
            .map(|entry| entry.restaurant)
            .filter(|r| qualifying.contains(&r.id))
            .collect();
        restaurants.sort_by_key(|r| r.id);
        restaurants.dedup_by_key(|r| r.id);

        Ok(restaurants)
    }

    /// Qualifying restaurants for an order, ranked by delivery distance.
    ///
    /// Restaurants whose address (or the order's address) cannot be
    /// resolved keep their place in the list with `distance_km: None` and
    /// sort after every ranked candidate.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError`] on catalog, cache, or provider failures.
    pub async fn ranked_for_order(
        &self,
        order: &Order,
    ) -> Result<Vec<RestaurantCandidate>, PlaceError> {
        let items = OrderRepository::new(self.pool).items(order.id).await?;
        let product_ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();

        let restaurants = self.restaurants_for(&product_ids).await?;

        let places = PlaceCache::new(self.pool, self.geocoder);
        let mut candidates = Vec::with_capacity(restaurants.len());
        for restaurant in restaurants {
            let distance_km = places.distance_km(&restaurant.address, &order.address).await?;
            candidates.push(RestaurantCandidate {
                restaurant,
                distance_km,
            });
        }

        sort_candidates(&mut candidates);
        Ok(candidates)
    }
}

/// Intersect per-product restaurant coverage: a restaurant qualifies only if
/// it stocks every distinct product.
///
/// Products absent from `coverage` have empty coverage, which empties the
/// intersection. An empty `product_ids` yields the empty set.
fn qualifying_restaurants(
    product_ids: &[ProductId],
    coverage: &[MenuCoverage],
) -> HashSet<RestaurantId> {
    let mut per_product: HashMap<ProductId, HashSet<RestaurantId>> = HashMap::new();
    for entry in coverage {
        per_product
            .entry(entry.product_id)
            .or_default()
            .insert(entry.restaurant.id);
    }

    let mut distinct = product_ids.iter();
    let Some(first) = distinct.next() else {
        return HashSet::new();
    };

    let mut qualifying = per_product.get(first).cloned().unwrap_or_default();
    for product_id in distinct {
        match per_product.get(product_id) {
            Some(stocking) => qualifying.retain(|r| stocking.contains(r)),
            None => qualifying.clear(),
        }
        if qualifying.is_empty() {
            break;
        }
    }

    qualifying
}

/// Order candidates by ascending distance; unrankable candidates last.
/// Ties break on restaurant id so output is deterministic.
fn sort_candidates(candidates: &mut [RestaurantCandidate]) {
    candidates.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x
            .total_cmp(&y)
            .then_with(|| a.restaurant.id.cmp(&b.restaurant.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.restaurant.id.cmp(&b.restaurant.id),
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn restaurant(id: i32, name: &str) -> Restaurant {
        Restaurant {
            id: RestaurantId::new(id),
            name: name.to_string(),
            address: format!("{name} street, 1"),
            contact_phone: String::new(),
        }
    }

    fn covers(product: i32, restaurant_id: i32, name: &str) -> MenuCoverage {
        MenuCoverage {
            product_id: ProductId::new(product),
            restaurant: restaurant(restaurant_id, name),
        }
    }

    #[test]
    fn test_single_restaurant_covering_everything() {
        // Sunrise carries {Pizza=1, Cola=2}; Valley carries {Pizza=1}.
        let coverage = vec![
            covers(1, 10, "Sunrise"),
            covers(2, 10, "Sunrise"),
            covers(1, 20, "Valley"),
        ];
        let order = [ProductId::new(1), ProductId::new(2)];

        let qualifying = qualifying_restaurants(&order, &coverage);
        assert_eq!(qualifying.len(), 1);
        assert!(qualifying.contains(&RestaurantId::new(10)));
    }

    #[test]
    fn test_disjoint_coverage_yields_empty_set() {
        let coverage = vec![covers(1, 10, "Sunrise"), covers(2, 20, "Valley")];
        let order = [ProductId::new(1), ProductId::new(2)];

        assert!(qualifying_restaurants(&order, &coverage).is_empty());
    }

    #[test]
    fn test_zero_items_yields_empty_set() {
        let coverage = vec![covers(1, 10, "Sunrise")];
        assert!(qualifying_restaurants(&[], &coverage).is_empty());
    }

    #[test]
    fn test_uncovered_product_yields_empty_set() {
        let coverage = vec![covers(1, 10, "Sunrise")];
        let order = [ProductId::new(1), ProductId::new(99)];

        assert!(qualifying_restaurants(&order, &coverage).is_empty());
    }

    #[test]
    fn test_repeated_product_counts_once() {
        let coverage = vec![covers(1, 10, "Sunrise")];
        // Two lines of the same product must not change the result
        let order = [ProductId::new(1), ProductId::new(1)];

        let qualifying = qualifying_restaurants(&order, &coverage);
        assert_eq!(qualifying.len(), 1);
    }

    #[test]
    fn test_multiple_qualifying_restaurants() {
        let coverage = vec![
            covers(1, 10, "Sunrise"),
            covers(1, 20, "Valley"),
            covers(2, 10, "Sunrise"),
            covers(2, 20, "Valley"),
        ];
        let order = [ProductId::new(1), ProductId::new(2)];

        let qualifying = qualifying_restaurants(&order, &coverage);
        assert_eq!(qualifying.len(), 2);
    }

    #[test]
    fn test_sort_ranked_ascending_unrankable_last() {
        let mut candidates = vec![
            RestaurantCandidate {
                restaurant: restaurant(1, "Far"),
                distance_km: Some(8.2),
            },
            RestaurantCandidate {
                restaurant: restaurant(2, "Lost"),
                distance_km: None,
            },
            RestaurantCandidate {
                restaurant: restaurant(3, "Near"),
                distance_km: Some(0.4),
            },
        ];

        sort_candidates(&mut candidates);

        let names: Vec<&str> = candidates
            .iter()
            .map(|c| c.restaurant.name.as_str())
            .collect();
        assert_eq!(names, ["Near", "Far", "Lost"]);
    }

    #[test]
    fn test_sort_unrankable_ties_break_on_id() {
        let mut candidates = vec![
            RestaurantCandidate {
                restaurant: restaurant(7, "B"),
                distance_km: None,
            },
            RestaurantCandidate {
                restaurant: restaurant(3, "A"),
                distance_km: None,
            },
        ];

        sort_candidates(&mut candidates);
        assert_eq!(candidates.first().unwrap().restaurant.name, "A");
    }
}
