//! Dispatch service: wires a candidate source to a matching policy.
//!
//! The service fetches candidates near the pickup and hands them to the engine.
//! It never writes an assignment back; callers commit the returned pick themselves.

use std::sync::Arc;

use tracing::{debug, info};

use crate::candidate::{DriverCandidate, MatchingCriteria};
use crate::directory::{CandidateSource, DriverListFeed, SubscriptionId};
use crate::matching::{DriverScore, MatchingAlgorithm};
use crate::spatial::distance_to_pickup_km;

/// Callback receiving a fresh ranking whenever the driver list changes.
pub type RankingHandler = Arc<dyn Fn(&[DriverScore]) + Send + Sync>;

/// Dispatch service over a candidate source and a matching policy.
pub struct Dispatcher<S> {
    source: S,
    algorithm: Arc<dyn MatchingAlgorithm>,
    search_radius_km: f64,
}

impl<S: CandidateSource> Dispatcher<S> {
    /// `search_radius_km` bounds the candidate query when a request sets no radius.
    pub fn new(source: S, algorithm: Arc<dyn MatchingAlgorithm>, search_radius_km: f64) -> Self {
        Self {
            source,
            algorithm,
            search_radius_km,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn algorithm(&self) -> &Arc<dyn MatchingAlgorithm> {
        &self.algorithm
    }

    pub fn search_radius_km(&self, criteria: &MatchingCriteria) -> f64 {
        criteria.radius_km(self.search_radius_km)
    }

    fn candidates(&self, criteria: &MatchingCriteria) -> Vec<DriverCandidate> {
        self.source
            .fetch_candidate_drivers(criteria.pickup, self.search_radius_km(criteria))
    }

    /// Ranked list of up to `limit` drivers for manual selection.
    pub fn propose(&self, criteria: &MatchingCriteria, limit: usize) -> Vec<DriverScore> {
        let candidates = self.candidates(criteria);
        self.algorithm.find_best_matches(&candidates, criteria, limit)
    }

    /// Single best driver for automatic assignment, or `None` when nobody is nearby.
    pub fn auto_assign(&self, criteria: &MatchingCriteria) -> Option<DriverScore> {
        let candidates = self.candidates(criteria);
        let pick = self.algorithm.auto_assign_driver(&candidates, criteria);
        match &pick {
            Some(score) => info!(
                algorithm = self.algorithm.name(),
                driver = %score.driver_id,
                score = score.score,
                eta_minutes = ?score.estimated_arrival_minutes,
                "Proposed driver for auto-assignment"
            ),
            None => info!(
                algorithm = self.algorithm.name(),
                candidates = candidates.len(),
                "No driver available for auto-assignment"
            ),
        }
        pick
    }

    /// Re-rank on every change pushed by `feed`.
    ///
    /// Each pushed snapshot is narrowed to drivers within the search radius and
    /// ranked from scratch; `on_ranking` receives the result, which may be empty.
    pub fn watch<F>(
        &self,
        feed: &F,
        criteria: MatchingCriteria,
        limit: usize,
        on_ranking: RankingHandler,
    ) -> SubscriptionId
    where
        F: DriverListFeed + ?Sized,
    {
        let algorithm = Arc::clone(&self.algorithm);
        let radius_km = self.search_radius_km(&criteria);
        feed.on_driver_list_changed(Arc::new(move |drivers: &[DriverCandidate]| {
            let nearby: Vec<DriverCandidate> = drivers
                .iter()
                .filter(|driver| {
                    distance_to_pickup_km(driver.location, criteria.pickup)
                        .is_some_and(|km| km <= radius_km)
                })
                .cloned()
                .collect();
            let ranking = algorithm.find_best_matches(&nearby, &criteria, limit);
            debug!(
                pushed = drivers.len(),
                nearby = nearby.len(),
                ranked = ranking.len(),
                "Re-ranked after driver list change"
            );
            on_ranking(&ranking);
        }))
    }
}
