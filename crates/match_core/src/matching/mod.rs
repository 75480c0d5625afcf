//! Driver matching engine.
//!
//! Scores each online candidate on three factors, combines them with a fixed
//! weight set and ranks the result:
//!
//! - **Distance**: linear falloff from the pickup to the configured radius
//! - **Vehicle**: whether the driver's vehicle can serve the requested class
//! - **Experience**: rating blended with a saturating delivery count
//!
//! The engine owns no state. Callers feed it fresh candidate lists and commit any
//! assignment themselves.

pub mod algorithm;
pub mod nearest;
pub mod scoring;
pub mod types;
pub mod weighted;
pub mod weights;

pub use algorithm::{rank_order, MatchingAlgorithm};
pub use nearest::{NearestMatching, DISTANCE_ONLY_WEIGHTS};
pub use types::{DriverScore, ScoreBreakdown};
pub use weighted::WeightedMatching;
pub use weights::{
    MatchWeights, UrgencyWeights, HIGH_URGENCY_WEIGHTS, LOW_URGENCY_WEIGHTS,
    NORMAL_URGENCY_WEIGHTS, URGENT_WEIGHTS,
};

/// Which matching policy to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingAlgorithmType {
    #[default]
    Weighted,
    Nearest,
}

/// Build a matching policy from its type and a config.
pub fn build_matching_algorithm(
    kind: MatchingAlgorithmType,
    config: crate::config::MatchingConfig,
) -> Result<Box<dyn MatchingAlgorithm>, crate::error::ConfigError> {
    Ok(match kind {
        MatchingAlgorithmType::Weighted => Box::new(WeightedMatching::new(config)?),
        MatchingAlgorithmType::Nearest => Box::new(NearestMatching::new(config)?),
    })
}
