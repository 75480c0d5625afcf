use serde::{Deserialize, Serialize};

use crate::candidate::DriverId;

use super::weights::MatchWeights;

/// Per-factor sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub distance: f64,
    pub vehicle: f64,
    pub experience: f64,
}

/// Result of scoring one driver against one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverScore {
    pub driver_id: DriverId,
    /// Composite score in `[0, 1]`; higher is better.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    /// Weight set that produced `score`.
    pub weights: MatchWeights,
    /// Great-circle distance to the pickup; `None` when the location is unknown.
    pub distance_km: Option<f64>,
    pub estimated_arrival_minutes: Option<u32>,
    pub estimated_cost: Option<f64>,
}
