//! Test helpers for common test setup and utilities.
//!
//! This module provides shared fixtures so unit tests, integration tests and
//! benches build drivers and pickups the same way.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::candidate::{DriverCandidate, MatchingCriteria};
use crate::spatial::{GeoPoint, EARTH_RADIUS_KM};
use crate::vehicle::VehicleType;

/// Standard pickup used across tests: central Berlin.
pub const TEST_PICKUP: GeoPoint = GeoPoint {
    lat: 52.52,
    lng: 13.405,
};

/// Kilometres per degree of latitude on the haversine sphere.
pub const KM_PER_DEGREE_LAT: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

pub fn test_pickup() -> GeoPoint {
    TEST_PICKUP
}

/// Point `km` due north of `origin`; its haversine distance to `origin` is `km`.
pub fn point_north_of(origin: GeoPoint, km: f64) -> GeoPoint {
    GeoPoint::new(origin.lat + km / KM_PER_DEGREE_LAT, origin.lng)
}

/// Point `km` due north of [`TEST_PICKUP`].
pub fn point_at_km(km: f64) -> GeoPoint {
    point_north_of(TEST_PICKUP, km)
}

/// Default criteria: test pickup, car required, normal urgency.
pub fn test_criteria() -> MatchingCriteria {
    MatchingCriteria::new(TEST_PICKUP, VehicleType::Car)
}

/// Online car driver `km` north of the test pickup.
pub fn driver_at_km(id: &str, km: f64, rating: f64, total_deliveries: u32) -> DriverCandidate {
    DriverCandidate::new(id, VehicleType::Car)
        .with_location(point_at_km(km))
        .with_rating(rating)
        .with_total_deliveries(total_deliveries)
}

/// Seeded fleet scattered uniformly in a square of half-side `spread_km` around `center`.
///
/// Roughly one driver in ten is offline and one in twenty has no location fix.
pub fn random_fleet(seed: u64, size: usize, center: GeoPoint, spread_km: f64) -> Vec<DriverCandidate> {
    let mut rng = StdRng::seed_from_u64(seed);
    let lat_spread = spread_km / KM_PER_DEGREE_LAT;
    let lng_spread = lat_spread / center.lat.to_radians().cos().max(0.01);

    (0..size)
        .map(|i| {
            let location = if rng.gen_bool(0.05) {
                None
            } else {
                Some(GeoPoint::new(
                    center.lat + rng.gen_range(-lat_spread..=lat_spread),
                    center.lng + rng.gen_range(-lng_spread..=lng_spread),
                ))
            };
            DriverCandidate {
                id: format!("driver-{i:05}").into(),
                location,
                rating: (rng.gen_range(30..=50) as f64) / 10.0,
                vehicle_type: VehicleType::ALL[rng.gen_range(0..VehicleType::ALL.len())],
                total_deliveries: rng.gen_range(0..2_000),
                is_online: rng.gen_bool(0.9),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::haversine_km;

    #[test]
    fn point_at_km_is_exact_distance() {
        for km in [0.5, 2.0, 15.0, 20.0] {
            let distance = haversine_km(TEST_PICKUP, point_at_km(km));
            assert!((distance - km).abs() < 1e-6, "expected {km}, got {distance}");
        }
    }

    #[test]
    fn random_fleet_is_reproducible() {
        let a = random_fleet(7, 50, TEST_PICKUP, 10.0);
        let b = random_fleet(7, 50, TEST_PICKUP, 10.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
    }
}
