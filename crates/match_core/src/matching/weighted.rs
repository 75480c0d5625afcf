use crate::candidate::{DriverCandidate, MatchingCriteria};
use crate::config::MatchingConfig;
use crate::error::ConfigError;

use super::algorithm::MatchingAlgorithm;
use super::scoring::score_driver;
use super::types::DriverScore;

/// Weighted multi-factor matching.
///
/// Composite score is a linear combination of the distance, vehicle and experience
/// sub-scores, using the weight set configured for the request's urgency.
#[derive(Debug, Clone, Default)]
pub struct WeightedMatching {
    config: MatchingConfig,
}

impl WeightedMatching {
    /// Build from a config, rejecting it if it does not validate.
    pub fn new(config: MatchingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }
}

impl MatchingAlgorithm for WeightedMatching {
    fn name(&self) -> &str {
        "weighted"
    }

    fn score(&self, driver: &DriverCandidate, criteria: &MatchingCriteria) -> DriverScore {
        let weights = self.config.weights.for_urgency(criteria.urgency);
        score_driver(driver, criteria, &self.config, weights, |b| {
            weights.combine(b.distance, b.vehicle, b.experience)
        })
    }
}
