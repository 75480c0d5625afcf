use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::candidate::{DriverCandidate, MatchingCriteria};

use super::types::DriverScore;

/// Trait for policies that rank drivers for a delivery request.
///
/// Implementations only decide how a single driver is scored. Filtering, ordering
/// and truncation are shared by the provided methods so every policy honours the
/// same contract:
///
/// - offline drivers are excluded, never scored
/// - results are sorted by composite score, descending
/// - ties go to the higher rating, then fewer deliveries, then the smaller driver id
/// - identical inputs give an identical ordered result
///
/// # Examples
///
/// ```rust
/// use match_core::candidate::{DriverCandidate, MatchingCriteria};
/// use match_core::matching::{MatchingAlgorithm, WeightedMatching};
/// use match_core::spatial::GeoPoint;
/// use match_core::vehicle::VehicleType;
///
/// let engine = WeightedMatching::default();
/// let pickup = GeoPoint::new(52.52, 13.405);
/// let criteria = MatchingCriteria::new(pickup, VehicleType::Car);
/// let drivers = vec![DriverCandidate::new("d1", VehicleType::Car)
///     .with_location(GeoPoint::new(52.53, 13.405))
///     .with_rating(4.8)];
///
/// let best = engine.auto_assign_driver(&drivers, &criteria).expect("online driver");
/// assert_eq!(best.driver_id.as_str(), "d1");
/// ```
pub trait MatchingAlgorithm: Send + Sync {
    /// Short policy name used in logs.
    fn name(&self) -> &str;

    /// Score one driver for one request. Pure; never fails.
    ///
    /// Unknown locations, unsuitable vehicles and empty histories map to worst-case
    /// sub-scores rather than errors.
    fn score(&self, driver: &DriverCandidate, criteria: &MatchingCriteria) -> DriverScore;

    /// Rank online drivers and return at most `limit` of them.
    ///
    /// A `limit` of 0 is treated as 1. Returns an empty vector when no driver is online.
    fn find_best_matches(
        &self,
        drivers: &[DriverCandidate],
        criteria: &MatchingCriteria,
        limit: usize,
    ) -> Vec<DriverScore> {
        let limit = limit.max(1);
        let online: Vec<&DriverCandidate> = drivers.iter().filter(|d| d.is_online).collect();
        if online.is_empty() {
            debug!(
                algorithm = self.name(),
                candidates = drivers.len(),
                "No online drivers to rank"
            );
            return Vec::new();
        }

        #[cfg(feature = "parallel")]
        let mut scored: Vec<(&DriverCandidate, DriverScore)> = {
            use rayon::prelude::*;
            online
                .par_iter()
                .map(|driver| (*driver, self.score(driver, criteria)))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let mut scored: Vec<(&DriverCandidate, DriverScore)> = online
            .iter()
            .map(|driver| (*driver, self.score(driver, criteria)))
            .collect();

        scored.sort_by(|(a_driver, a_score), (b_driver, b_score)| {
            rank_order(a_driver, a_score, b_driver, b_score)
        });
        scored.truncate(limit);

        for (_, ranked) in &scored {
            trace!(
                driver = %ranked.driver_id,
                score = ranked.score,
                distance = ranked.breakdown.distance,
                vehicle = ranked.breakdown.vehicle,
                experience = ranked.breakdown.experience,
                "Ranked driver"
            );
        }
        debug!(
            algorithm = self.name(),
            candidates = drivers.len(),
            online = online.len(),
            returned = scored.len(),
            top_score = ?scored.first().map(|(_, s)| s.score),
            "Ranked drivers"
        );

        scored.into_iter().map(|(_, score)| score).collect()
    }

    /// Pick the single best online driver, or `None` when there is no candidate.
    ///
    /// Only proposes; committing the assignment is the caller's job.
    fn auto_assign_driver(
        &self,
        drivers: &[DriverCandidate],
        criteria: &MatchingCriteria,
    ) -> Option<DriverScore> {
        self.find_best_matches(drivers, criteria, 1).into_iter().next()
    }
}

/// Total order used for ranking: best first.
pub fn rank_order(
    a_driver: &DriverCandidate,
    a_score: &DriverScore,
    b_driver: &DriverCandidate,
    b_score: &DriverScore,
) -> Ordering {
    b_score
        .score
        .total_cmp(&a_score.score)
        .then_with(|| {
            b_driver
                .sanitized_rating()
                .total_cmp(&a_driver.sanitized_rating())
        })
        .then_with(|| a_driver.total_deliveries.cmp(&b_driver.total_deliveries))
        .then_with(|| a_driver.id.cmp(&b_driver.id))
}
