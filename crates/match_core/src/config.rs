//! Tunable matching policy: radius, speed, sub-score shaping, weights and prices.
//!
//! Every field has a default, so a JSON file only needs the values it overrides.

use std::env;
use std::fs::read_to_string;
use std::path::Path;

use h3o::Resolution;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::eta::DEFAULT_AVERAGE_SPEED_KMH;
use crate::matching::{MatchWeights, UrgencyWeights};
use crate::pricing::PricingConfig;
use crate::vehicle::VehicleType;

/// Environment variable naming a JSON config file for [`MatchingConfig::load`].
pub const CONFIG_PATH_ENV: &str = "MATCH_CORE_CONFIG";

/// Distance at which the distance sub-score reaches zero.
pub const DEFAULT_MAX_RADIUS_KM: f64 = 20.0;

/// Vehicle sub-score for a driver whose vehicle cannot serve the request.
pub const DEFAULT_VEHICLE_MISMATCH_SCORE: f64 = 0.2;

/// Share of the experience sub-score that comes from rating (the rest from deliveries).
pub const DEFAULT_RATING_SHARE: f64 = 0.6;

/// Delivery count at which the delivery component of experience saturates.
pub const DEFAULT_DELIVERY_SATURATION: u32 = 500;

/// H3 resolution used by the driver directory.
pub const DEFAULT_SPATIAL_RESOLUTION: u8 = 7;

/// Shape of the experience sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    pub rating_share: f64,
    pub delivery_saturation: u32,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            rating_share: DEFAULT_RATING_SHARE,
            delivery_saturation: DEFAULT_DELIVERY_SATURATION,
        }
    }
}

/// Matching policy shared by the engine and the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub max_radius_km: f64,
    pub average_speed_kmh: f64,
    pub vehicle_mismatch_score: f64,
    pub experience: ExperienceConfig,
    pub weights: UrgencyWeights,
    pub pricing: PricingConfig,
    pub spatial_resolution: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_radius_km: DEFAULT_MAX_RADIUS_KM,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
            vehicle_mismatch_score: DEFAULT_VEHICLE_MISMATCH_SCORE,
            experience: ExperienceConfig::default(),
            weights: UrgencyWeights::default(),
            pricing: PricingConfig::default(),
            spatial_resolution: DEFAULT_SPATIAL_RESOLUTION,
        }
    }
}

impl MatchingConfig {
    pub fn with_max_radius_km(mut self, max_radius_km: f64) -> Self {
        self.max_radius_km = max_radius_km;
        self
    }

    pub fn with_average_speed_kmh(mut self, average_speed_kmh: f64) -> Self {
        self.average_speed_kmh = average_speed_kmh;
        self
    }

    pub fn with_vehicle_mismatch_score(mut self, score: f64) -> Self {
        self.vehicle_mismatch_score = score;
        self
    }

    pub fn with_experience(mut self, experience: ExperienceConfig) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_weights(mut self, weights: UrgencyWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Use one weight set for every urgency level.
    pub fn with_uniform_weights(mut self, weights: MatchWeights) -> Self {
        self.weights = UrgencyWeights::uniform(weights);
        self
    }

    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_spatial_resolution(mut self, resolution: u8) -> Self {
        self.spatial_resolution = resolution;
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        info!(path = %path.display(), "Loaded matching config");
        Ok(config)
    }

    /// Load from the file named by [`CONFIG_PATH_ENV`], or defaults when it is unset.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_path(&path).map_err(|e| {
                warn!("Invalid matching config at {path}: {e}");
                e
            }),
            Err(_) => {
                info!("{CONFIG_PATH_ENV} not set, using default matching config");
                Ok(Self::default())
            }
        }
    }

    /// H3 resolution for the driver index.
    pub fn resolution(&self) -> Result<Resolution, ConfigError> {
        Resolution::try_from(self.spatial_resolution)
            .map_err(|_| ConfigError::InvalidResolution(self.spatial_resolution))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_radius_km", self.max_radius_km)?;
        positive("average_speed_kmh", self.average_speed_kmh)?;
        unit_range("vehicle_mismatch_score", self.vehicle_mismatch_score)?;
        unit_range("experience.rating_share", self.experience.rating_share)?;
        if self.experience.delivery_saturation == 0 {
            return Err(ConfigError::ZeroSaturation);
        }
        for (urgency, weights) in self.weights.iter() {
            if !weights.is_valid() {
                return Err(ConfigError::InvalidWeights { urgency, weights });
            }
        }
        for vehicle in VehicleType::ALL {
            let rate = self.pricing.rates.rate(vehicle);
            let usable = |v: f64| v.is_finite() && v >= 0.0;
            if !usable(rate.base_fee) || !usable(rate.per_km) {
                return Err(ConfigError::InvalidRate {
                    vehicle,
                    base_fee: rate.base_fee,
                    per_km: rate.per_km,
                });
            }
        }
        if let Some(bad) = self
            .pricing
            .urgency_multipliers
            .iter()
            .find(|m| !m.is_finite() || *m <= 0.0)
        {
            return Err(ConfigError::InvalidMultiplier(bad));
        }
        self.resolution()?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}
