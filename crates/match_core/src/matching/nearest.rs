use crate::candidate::{DriverCandidate, MatchingCriteria};
use crate::config::MatchingConfig;
use crate::error::ConfigError;

use super::algorithm::MatchingAlgorithm;
use super::scoring::score_driver;
use super::types::DriverScore;
use super::weights::MatchWeights;

/// Proximity-only matching: the composite score is the distance sub-score.
///
/// Vehicle fit and experience are still reported in the breakdown, and the rating
/// tie-break still applies, but neither moves a driver ahead of a closer one.
/// Useful as a baseline against [`super::WeightedMatching`].
#[derive(Debug, Clone, Default)]
pub struct NearestMatching {
    config: MatchingConfig,
}

/// Weight set reported by [`NearestMatching`].
pub const DISTANCE_ONLY_WEIGHTS: MatchWeights = MatchWeights::new(1.0, 0.0, 0.0);

impl NearestMatching {
    /// Build from a config, rejecting invalid values.
    pub fn new(config: MatchingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl MatchingAlgorithm for NearestMatching {
    fn name(&self) -> &str {
        "nearest"
    }

    fn score(&self, driver: &DriverCandidate, criteria: &MatchingCriteria) -> DriverScore {
        score_driver(driver, criteria, &self.config, DISTANCE_ONLY_WEIGHTS, |b| {
            b.distance
        })
    }
}
