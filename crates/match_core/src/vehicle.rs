//! Vehicle classes and the capability table used for vehicle-fit scoring.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Vehicle category a driver operates, ordered by carrying capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Bicycle,
    Motorcycle,
    #[default]
    Car,
    Van,
    Truck,
}

impl VehicleType {
    pub const ALL: [VehicleType; 5] = [
        VehicleType::Bicycle,
        VehicleType::Motorcycle,
        VehicleType::Car,
        VehicleType::Van,
        VehicleType::Truck,
    ];

    /// Capacity rank; a vehicle can carry any load a lower-ranked vehicle can.
    pub fn capacity_rank(self) -> u8 {
        match self {
            VehicleType::Bicycle => 0,
            VehicleType::Motorcycle => 1,
            VehicleType::Car => 2,
            VehicleType::Van => 3,
            VehicleType::Truck => 4,
        }
    }

    /// Whether this vehicle can serve a request that requires `required`.
    ///
    /// A larger vehicle satisfies a smaller request but never the reverse.
    pub fn satisfies(self, required: VehicleType) -> bool {
        self.capacity_rank() >= required.capacity_rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Bicycle => "bicycle",
            VehicleType::Motorcycle => "motorcycle",
            VehicleType::Car => "car",
            VehicleType::Van => "van",
            VehicleType::Truck => "truck",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_satisfies() {
        for vehicle in VehicleType::ALL {
            assert!(vehicle.satisfies(vehicle), "{vehicle} should satisfy itself");
        }
    }

    #[test]
    fn larger_vehicle_satisfies_smaller_request_only() {
        assert!(VehicleType::Van.satisfies(VehicleType::Car));
        assert!(VehicleType::Truck.satisfies(VehicleType::Bicycle));
        assert!(!VehicleType::Car.satisfies(VehicleType::Van));
        assert!(!VehicleType::Bicycle.satisfies(VehicleType::Motorcycle));
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&VehicleType::Motorcycle).expect("serialize");
        assert_eq!(json, "\"motorcycle\"");
        let parsed: VehicleType = serde_json::from_str("\"van\"").expect("deserialize");
        assert_eq!(parsed, VehicleType::Van);
    }
}
