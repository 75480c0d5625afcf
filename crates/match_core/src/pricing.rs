//! Delivery cost estimates from distance, vehicle class and urgency.

use serde::{Deserialize, Serialize};

use crate::candidate::Urgency;
use crate::vehicle::VehicleType;

/// Base fee and per-kilometre rate for one vehicle class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleRate {
    pub base_fee: f64,
    pub per_km: f64,
}

impl VehicleRate {
    pub const fn new(base_fee: f64, per_km: f64) -> Self {
        Self { base_fee, per_km }
    }
}

/// Rates per vehicle class, in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTable {
    pub bicycle: VehicleRate,
    pub motorcycle: VehicleRate,
    pub car: VehicleRate,
    pub van: VehicleRate,
    pub truck: VehicleRate,
}

impl RateTable {
    pub fn rate(&self, vehicle: VehicleType) -> VehicleRate {
        match vehicle {
            VehicleType::Bicycle => self.bicycle,
            VehicleType::Motorcycle => self.motorcycle,
            VehicleType::Car => self.car,
            VehicleType::Van => self.van,
            VehicleType::Truck => self.truck,
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            bicycle: VehicleRate::new(2.00, 0.80),
            motorcycle: VehicleRate::new(2.50, 1.00),
            car: VehicleRate::new(3.50, 1.50),
            van: VehicleRate::new(5.00, 2.00),
            truck: VehicleRate::new(8.00, 3.00),
        }
    }
}

/// Price multipliers applied on top of the vehicle rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyMultipliers {
    pub low: f64,
    pub normal: f64,
    pub high: f64,
    pub urgent: f64,
}

impl UrgencyMultipliers {
    pub fn for_urgency(&self, urgency: Urgency) -> f64 {
        match urgency {
            Urgency::Low => self.low,
            Urgency::Normal => self.normal,
            Urgency::High => self.high,
            Urgency::Urgent => self.urgent,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> {
        [self.low, self.normal, self.high, self.urgent].into_iter()
    }
}

impl Default for UrgencyMultipliers {
    fn default() -> Self {
        Self {
            low: 0.90,
            normal: 1.00,
            high: 1.25,
            urgent: 1.50,
        }
    }
}

/// Pricing configuration for cost estimates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub rates: RateTable,
    pub urgency_multipliers: UrgencyMultipliers,
}

/// Estimate the delivery cost for a driver `distance_km` from the pickup.
///
/// Formula: `(base_fee + distance_km * per_km) * urgency_multiplier`, rounded to cents.
/// The rate is taken from the requested vehicle class so that every candidate for
/// the same request is priced on the same table.
pub fn estimate_cost(
    distance_km: f64,
    vehicle: VehicleType,
    urgency: Urgency,
    pricing: &PricingConfig,
) -> f64 {
    let distance_km = if distance_km.is_finite() {
        distance_km.max(0.0)
    } else {
        0.0
    };
    let rate = pricing.rates.rate(vehicle);
    let multiplier = pricing.urgency_multipliers.for_urgency(urgency);
    round_to_cents((rate.base_fee + distance_km * rate.per_km) * multiplier)
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
