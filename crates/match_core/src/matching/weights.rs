//! Weight sets combining sub-scores into the composite match score.

use serde::{Deserialize, Serialize};

use crate::candidate::Urgency;

/// Tolerance when checking that a weight set sums to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights applied to the distance, vehicle and experience sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub distance: f64,
    pub vehicle: f64,
    pub experience: f64,
}

/// Low urgency: reward experienced drivers over proximity.
pub const LOW_URGENCY_WEIGHTS: MatchWeights = MatchWeights {
    distance: 0.30,
    vehicle: 0.30,
    experience: 0.40,
};

/// Default weighting for normal requests.
pub const NORMAL_URGENCY_WEIGHTS: MatchWeights = MatchWeights {
    distance: 0.40,
    vehicle: 0.30,
    experience: 0.30,
};

pub const HIGH_URGENCY_WEIGHTS: MatchWeights = MatchWeights {
    distance: 0.50,
    vehicle: 0.30,
    experience: 0.20,
};

/// Urgent: proximity dominates.
pub const URGENT_WEIGHTS: MatchWeights = MatchWeights {
    distance: 0.60,
    vehicle: 0.25,
    experience: 0.15,
};

impl MatchWeights {
    pub const fn new(distance: f64, vehicle: f64, experience: f64) -> Self {
        Self {
            distance,
            vehicle,
            experience,
        }
    }

    pub fn sum(&self) -> f64 {
        self.distance + self.vehicle + self.experience
    }

    /// All weights finite and non-negative, summing to one.
    pub fn is_valid(&self) -> bool {
        let parts = [self.distance, self.vehicle, self.experience];
        parts.iter().all(|w| w.is_finite() && *w >= 0.0)
            && (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    /// Weighted sum of the three sub-scores.
    pub fn combine(&self, distance: f64, vehicle: f64, experience: f64) -> f64 {
        self.distance * distance + self.vehicle * vehicle + self.experience * experience
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        NORMAL_URGENCY_WEIGHTS
    }
}

/// One weight set per urgency level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyWeights {
    pub low: MatchWeights,
    pub normal: MatchWeights,
    pub high: MatchWeights,
    pub urgent: MatchWeights,
}

impl UrgencyWeights {
    /// The same weight set regardless of urgency.
    pub fn uniform(weights: MatchWeights) -> Self {
        Self {
            low: weights,
            normal: weights,
            high: weights,
            urgent: weights,
        }
    }

    pub fn for_urgency(&self, urgency: Urgency) -> MatchWeights {
        match urgency {
            Urgency::Low => self.low,
            Urgency::Normal => self.normal,
            Urgency::High => self.high,
            Urgency::Urgent => self.urgent,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Urgency, MatchWeights)> {
        [
            (Urgency::Low, self.low),
            (Urgency::Normal, self.normal),
            (Urgency::High, self.high),
            (Urgency::Urgent, self.urgent),
        ]
        .into_iter()
    }
}

impl Default for UrgencyWeights {
    fn default() -> Self {
        Self {
            low: LOW_URGENCY_WEIGHTS,
            normal: NORMAL_URGENCY_WEIGHTS,
            high: HIGH_URGENCY_WEIGHTS,
            urgent: URGENT_WEIGHTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weight_sets_sum_to_one() {
        for (urgency, weights) in UrgencyWeights::default().iter() {
            assert!(weights.is_valid(), "{urgency:?} weights invalid: {weights:?}");
        }
    }

    #[test]
    fn normal_weights_are_40_30_30() {
        let weights = UrgencyWeights::default().for_urgency(Urgency::Normal);
        assert_eq!(weights, MatchWeights::new(0.40, 0.30, 0.30));
        assert_eq!(MatchWeights::default(), weights);
    }

    #[test]
    fn urgency_shifts_weight_toward_distance() {
        let table = UrgencyWeights::default();
        let order = [Urgency::Low, Urgency::Normal, Urgency::High, Urgency::Urgent];
        let distance: Vec<f64> = order
            .iter()
            .map(|u| table.for_urgency(*u).distance)
            .collect();
        assert!(distance.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn rejects_negative_or_unbalanced_weights() {
        assert!(!MatchWeights::new(0.5, 0.5, 0.5).is_valid());
        assert!(!MatchWeights::new(1.2, -0.1, -0.1).is_valid());
        assert!(!MatchWeights::new(f64::NAN, 0.5, 0.5).is_valid());
    }
}
