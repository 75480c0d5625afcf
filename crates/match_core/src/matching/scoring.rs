//! Sub-score functions. Each returns a value in `[0, 1]`, higher is better.

use crate::candidate::{DriverCandidate, MatchingCriteria, MAX_RATING};
use crate::config::{ExperienceConfig, MatchingConfig};
use crate::eta::estimate_arrival_minutes;
use crate::pricing::estimate_cost;
use crate::spatial::distance_to_pickup_km;
use crate::vehicle::VehicleType;

use super::types::{DriverScore, ScoreBreakdown};
use super::weights::MatchWeights;

/// Clamp to `[0, 1]`; non-finite values become 0.
pub fn sanitize_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Linear falloff: 1.0 at the pickup, 0.0 at `radius_km` and beyond.
///
/// An unknown distance scores 0.0, the same as a driver at the radius.
pub fn distance_score(distance_km: Option<f64>, radius_km: f64) -> f64 {
    match distance_km {
        Some(km) if radius_km > 0.0 => sanitize_unit(1.0 - km / radius_km),
        _ => 0.0,
    }
}

/// 1.0 when `driver_vehicle` can serve `required`, otherwise `mismatch_score`.
pub fn vehicle_score(driver_vehicle: VehicleType, required: VehicleType, mismatch_score: f64) -> f64 {
    if driver_vehicle.satisfies(required) {
        1.0
    } else {
        sanitize_unit(mismatch_score)
    }
}

/// Blend of normalised rating and log-saturated delivery count.
pub fn experience_score(rating: f64, total_deliveries: u32, experience: &ExperienceConfig) -> f64 {
    let rating_norm = sanitize_unit(rating / MAX_RATING);
    let saturation = experience.delivery_saturation.max(1) as f64;
    let deliveries_norm = sanitize_unit((1.0 + total_deliveries as f64).ln() / (1.0 + saturation).ln());
    let share = sanitize_unit(experience.rating_share);
    sanitize_unit(share * rating_norm + (1.0 - share) * deliveries_norm)
}

/// Score one driver with the given weight set.
///
/// Shared by every algorithm so ETA and cost estimates stay identical across policies;
/// `composite` turns the breakdown into the ranking score.
pub fn score_driver(
    driver: &DriverCandidate,
    criteria: &MatchingCriteria,
    config: &MatchingConfig,
    weights: MatchWeights,
    composite: impl Fn(&ScoreBreakdown) -> f64,
) -> DriverScore {
    let distance_km = distance_to_pickup_km(driver.location, criteria.pickup);
    let radius_km = criteria.radius_km(config.max_radius_km);

    let breakdown = ScoreBreakdown {
        distance: distance_score(distance_km, radius_km),
        vehicle: vehicle_score(
            driver.vehicle_type,
            criteria.required_vehicle,
            config.vehicle_mismatch_score,
        ),
        experience: experience_score(
            driver.sanitized_rating(),
            driver.total_deliveries,
            &config.experience,
        ),
    };

    DriverScore {
        driver_id: driver.id.clone(),
        score: sanitize_unit(composite(&breakdown)),
        breakdown,
        weights,
        distance_km,
        estimated_arrival_minutes: distance_km
            .map(|km| estimate_arrival_minutes(km, config.average_speed_kmh)),
        estimated_cost: distance_km.map(|km| {
            estimate_cost(
                km,
                criteria.required_vehicle,
                criteria.urgency,
                &config.pricing,
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_score_is_linear() {
        assert_eq!(distance_score(Some(0.0), 20.0), 1.0);
        assert!((distance_score(Some(5.0), 20.0) - 0.75).abs() < 1e-12);
        assert!((distance_score(Some(10.0), 20.0) - 0.5).abs() < 1e-12);
        assert_eq!(distance_score(Some(20.0), 20.0), 0.0);
        assert_eq!(distance_score(Some(35.0), 20.0), 0.0);
    }

    #[test]
    fn unknown_distance_is_worst_case() {
        assert_eq!(distance_score(None, 20.0), 0.0);
        assert_eq!(distance_score(Some(f64::NAN), 20.0), 0.0);
    }

    #[test]
    fn vehicle_mismatch_is_down_ranked_not_zeroed() {
        assert_eq!(vehicle_score(VehicleType::Van, VehicleType::Car, 0.2), 1.0);
        assert_eq!(vehicle_score(VehicleType::Bicycle, VehicleType::Car, 0.2), 0.2);
    }

    #[test]
    fn experience_saturates() {
        let cfg = ExperienceConfig::default();
        assert_eq!(experience_score(5.0, 500, &cfg), 1.0);
        assert_eq!(experience_score(5.0, 50_000, &cfg), 1.0);
        assert_eq!(experience_score(0.0, 0, &cfg), 0.0);
    }

    #[test]
    fn experience_is_monotonic_in_rating_and_deliveries() {
        let cfg = ExperienceConfig::default();
        let mut previous = experience_score(3.0, 0, &cfg);
        for deliveries in [1, 10, 100, 250, 499, 500] {
            let current = experience_score(3.0, deliveries, &cfg);
            assert!(current >= previous);
            previous = current;
        }
        assert!(experience_score(4.5, 10, &cfg) > experience_score(4.0, 10, &cfg));
    }

    #[test]
    fn sanitize_unit_handles_non_finite() {
        assert_eq!(sanitize_unit(f64::NAN), 0.0);
        assert_eq!(sanitize_unit(f64::INFINITY), 0.0);
        assert_eq!(sanitize_unit(-0.5), 0.0);
        assert_eq!(sanitize_unit(1.5), 1.0);
    }
}
