//! Inputs to the matching engine: candidate drivers and per-request criteria.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::spatial::GeoPoint;
use crate::vehicle::VehicleType;

/// Opaque driver identifier supplied by the data platform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(pub String);

impl DriverId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DriverId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DriverId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Highest rating a driver can hold.
pub const MAX_RATING: f64 = 5.0;

/// A driver as seen by the engine. Read-only during matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverCandidate {
    pub id: DriverId,
    /// Last known position; `None` when the platform has no fix for the driver.
    pub location: Option<GeoPoint>,
    /// Average rating on a 0.0–5.0 scale.
    pub rating: f64,
    pub vehicle_type: VehicleType,
    pub total_deliveries: u32,
    pub is_online: bool,
}

impl DriverCandidate {
    /// An online driver with no location, no rating and no history.
    pub fn new(id: impl Into<DriverId>, vehicle_type: VehicleType) -> Self {
        Self {
            id: id.into(),
            location: None,
            rating: 0.0,
            vehicle_type,
            total_deliveries: 0,
            is_online: true,
        }
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_total_deliveries(mut self, total_deliveries: u32) -> Self {
        self.total_deliveries = total_deliveries;
        self
    }

    pub fn with_online(mut self, is_online: bool) -> Self {
        self.is_online = is_online;
        self
    }

    /// Rating clamped to the valid scale; non-finite ratings count as zero.
    pub fn sanitized_rating(&self) -> f64 {
        if self.rating.is_finite() {
            self.rating.clamp(0.0, MAX_RATING)
        } else {
            0.0
        }
    }
}

/// How time-critical a delivery request is. Changes weighting and price, never eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// Per-request matching input built by the caller from a pending delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingCriteria {
    pub pickup: GeoPoint,
    pub required_vehicle: VehicleType,
    #[serde(default)]
    pub urgency: Urgency,
    /// Distance at which the distance sub-score reaches zero for this request.
    #[serde(default)]
    pub max_distance_km: Option<f64>,
}

impl MatchingCriteria {
    pub fn new(pickup: GeoPoint, required_vehicle: VehicleType) -> Self {
        Self {
            pickup,
            required_vehicle,
            urgency: Urgency::Normal,
            max_distance_km: None,
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_max_distance_km(mut self, max_distance_km: f64) -> Self {
        self.max_distance_km = Some(max_distance_km);
        self
    }

    /// Normalisation radius for this request, falling back to `default_km`
    /// when no usable override is set.
    pub fn radius_km(&self, default_km: f64) -> f64 {
        match self.max_distance_km {
            Some(km) if km.is_finite() && km > 0.0 => km,
            _ => default_km,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_is_clamped_and_sanitized() {
        let driver = DriverCandidate::new("d1", VehicleType::Car).with_rating(7.5);
        assert_eq!(driver.sanitized_rating(), MAX_RATING);

        let driver = driver.with_rating(-1.0);
        assert_eq!(driver.sanitized_rating(), 0.0);

        let driver = driver.with_rating(f64::NAN);
        assert_eq!(driver.sanitized_rating(), 0.0);
    }

    #[test]
    fn radius_override_ignores_unusable_values() {
        let criteria = MatchingCriteria::new(GeoPoint::new(52.52, 13.405), VehicleType::Car);
        assert_eq!(criteria.radius_km(20.0), 20.0);
        assert_eq!(criteria.clone().with_max_distance_km(5.0).radius_km(20.0), 5.0);
        assert_eq!(criteria.clone().with_max_distance_km(0.0).radius_km(20.0), 20.0);
        assert_eq!(criteria.with_max_distance_km(f64::NAN).radius_km(20.0), 20.0);
    }

    #[test]
    fn criteria_deserializes_with_defaults() {
        let json = r#"{"pickup":{"lat":52.5,"lng":13.4},"required_vehicle":"van"}"#;
        let criteria: MatchingCriteria = serde_json::from_str(json).expect("criteria");
        assert_eq!(criteria.urgency, Urgency::Normal);
        assert_eq!(criteria.max_distance_km, None);
        assert_eq!(criteria.required_vehicle, VehicleType::Van);
    }
}
