use std::path::PathBuf;

use thiserror::Error;

use crate::candidate::{DriverId, Urgency};
use crate::matching::MatchWeights;
use crate::vehicle::VehicleType;

/// Errors raised while loading or validating a [`crate::config::MatchingConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{urgency:?} weights must be non-negative and sum to 1, got {weights:?}")]
    InvalidWeights {
        urgency: Urgency,
        weights: MatchWeights,
    },

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("Delivery saturation must be at least 1")]
    ZeroSaturation,

    #[error("Invalid H3 resolution {0}")]
    InvalidResolution(u8),

    #[error("Rate for {vehicle} must be non-negative and finite, got {base_fee} + {per_km}/km")]
    InvalidRate {
        vehicle: VehicleType,
        base_fee: f64,
        per_km: f64,
    },

    #[error("Urgency multiplier must be positive and finite, got {0}")]
    InvalidMultiplier(f64),
}

/// Errors raised by [`crate::directory::DriverDirectory`] mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Unknown driver {0}")]
    UnknownDriver(DriverId),
}
