use match_core::candidate::{DriverCandidate, MatchingCriteria};
use match_core::test_helpers::{driver_at_km, point_at_km, test_pickup};
use match_core::vehicle::VehicleType;

/// Pickup shared by the scenario tests.
pub fn seeded_criteria(required: VehicleType) -> MatchingCriteria {
    MatchingCriteria::new(test_pickup(), required)
}

/// Driver A: close, highly rated, experienced, car.
pub fn veteran_nearby() -> DriverCandidate {
    driver_at_km("driver-a", 2.0, 4.9, 500)
}

/// Driver B: far, average rating, few deliveries, bicycle.
pub fn novice_far_on_bicycle() -> DriverCandidate {
    DriverCandidate::new("driver-b", VehicleType::Bicycle)
        .with_location(point_at_km(15.0))
        .with_rating(4.0)
        .with_total_deliveries(10)
}

/// A handful of online and offline drivers at assorted distances.
pub fn mixed_fleet() -> Vec<DriverCandidate> {
    vec![
        driver_at_km("d-01", 1.0, 4.2, 120),
        driver_at_km("d-02", 3.5, 4.8, 800),
        driver_at_km("d-03", 0.5, 3.1, 4).with_online(false),
        driver_at_km("d-04", 12.0, 5.0, 2_000),
        DriverCandidate::new("d-05", VehicleType::Van)
            .with_location(point_at_km(6.0))
            .with_rating(4.6)
            .with_total_deliveries(300),
        DriverCandidate::new("d-06", VehicleType::Motorcycle)
            .with_location(point_at_km(0.8))
            .with_rating(4.9)
            .with_total_deliveries(60),
        DriverCandidate::new("d-07", VehicleType::Car).with_rating(5.0),
        driver_at_km("d-08", 25.0, 4.4, 50).with_online(false),
    ]
}
