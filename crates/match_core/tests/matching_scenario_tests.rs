mod support;

use match_core::candidate::{DriverCandidate, Urgency};
use match_core::config::{MatchingConfig, DEFAULT_MAX_RADIUS_KM};
use match_core::matching::{
    build_matching_algorithm, MatchingAlgorithm, MatchingAlgorithmType, NearestMatching,
    WeightedMatching,
};
use match_core::test_helpers::{driver_at_km, point_at_km, test_criteria};
use match_core::vehicle::VehicleType;
use support::fleet::{mixed_fleet, novice_far_on_bicycle, seeded_criteria, veteran_nearby};

#[test]
fn close_veteran_beats_far_novice_by_a_wide_margin() {
    let engine = WeightedMatching::default();
    let criteria = seeded_criteria(VehicleType::Car);
    let drivers = vec![novice_far_on_bicycle(), veteran_nearby()];

    let ranking = engine.find_best_matches(&drivers, &criteria, 2);

    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0].driver_id.as_str(), "driver-a");
    assert_eq!(ranking[1].driver_id.as_str(), "driver-b");
    let margin = ranking[0].score - ranking[1].score;
    assert!(margin >= 0.3, "margin {margin} should be at least 0.3");

    assert!((ranking[0].breakdown.distance - 0.9).abs() < 1e-6);
    assert_eq!(ranking[0].breakdown.vehicle, 1.0);
    assert!((ranking[1].breakdown.distance - 0.25).abs() < 1e-6);
    assert_eq!(ranking[1].breakdown.vehicle, 0.2);
}

#[test]
fn unknown_location_scores_no_better_than_max_radius() {
    let engine = WeightedMatching::default();
    let criteria = test_criteria();
    let at_radius = driver_at_km("edge", DEFAULT_MAX_RADIUS_KM, 4.5, 100);
    let unlocated = DriverCandidate::new("lost", VehicleType::Car)
        .with_rating(4.5)
        .with_total_deliveries(100);

    let edge_score = engine.score(&at_radius, &criteria);
    let lost_score = engine.score(&unlocated, &criteria);

    assert_eq!(lost_score.breakdown.distance, 0.0);
    assert!(lost_score.score <= edge_score.score);
    assert!(lost_score.estimated_arrival_minutes.is_none());
    assert!(edge_score.estimated_arrival_minutes.is_some());
}

#[test]
fn empty_input_gives_empty_ranking_and_no_assignment() {
    let engine = WeightedMatching::default();
    let criteria = test_criteria();

    assert!(engine.find_best_matches(&[], &criteria, 5).is_empty());
    assert!(engine.auto_assign_driver(&[], &criteria).is_none());
}

#[test]
fn all_offline_gives_no_assignment() {
    let engine = WeightedMatching::default();
    let drivers: Vec<DriverCandidate> = mixed_fleet()
        .into_iter()
        .map(|d| d.with_online(false))
        .collect();

    assert!(engine.find_best_matches(&drivers, &test_criteria(), 3).is_empty());
    assert!(engine.auto_assign_driver(&drivers, &test_criteria()).is_none());
}

#[test]
fn limit_caps_results_at_online_count() {
    let engine = WeightedMatching::default();
    let drivers = mixed_fleet();
    let criteria = test_criteria();

    assert_eq!(engine.find_best_matches(&drivers, &criteria, 3).len(), 3);
    assert_eq!(engine.find_best_matches(&drivers, &criteria, 6).len(), 6);
    assert_eq!(engine.find_best_matches(&drivers, &criteria, 50).len(), 6);
}

#[test]
fn zero_limit_is_treated_as_one() {
    let engine = WeightedMatching::default();
    let drivers = mixed_fleet();
    let criteria = test_criteria();

    let ranking = engine.find_best_matches(&drivers, &criteria, 0);
    assert_eq!(ranking.len(), 1);
    assert_eq!(
        Some(&ranking[0]),
        engine.auto_assign_driver(&drivers, &criteria).as_ref()
    );
}

#[test]
fn ranking_is_sorted_and_excludes_offline() {
    let engine = WeightedMatching::default();
    let ranking = engine.find_best_matches(&mixed_fleet(), &test_criteria(), 10);

    assert!(ranking.windows(2).all(|pair| pair[0].score >= pair[1].score));
    assert!(ranking
        .iter()
        .all(|s| s.driver_id.as_str() != "d-03" && s.driver_id.as_str() != "d-08"));
}

#[test]
fn ties_prefer_higher_rating_then_fewer_deliveries_then_id() {
    // Proximity-only scoring lets drivers at the same spot tie on the composite.
    let engine = NearestMatching::default();
    let criteria = test_criteria();
    let drivers = vec![
        driver_at_km("z-fresh", 3.0, 4.0, 10),
        driver_at_km("b-veteran", 3.0, 4.0, 900),
        driver_at_km("y-star", 3.0, 4.9, 900),
        driver_at_km("a-fresh", 3.0, 4.0, 10),
    ];

    let ids: Vec<String> = engine
        .find_best_matches(&drivers, &criteria, 4)
        .into_iter()
        .map(|s| s.driver_id.0)
        .collect();

    assert_eq!(ids, vec!["y-star", "a-fresh", "z-fresh", "b-veteran"]);
}

#[test]
fn input_order_does_not_change_ranking() {
    let engine = WeightedMatching::default();
    let criteria = test_criteria();
    let drivers = mixed_fleet();
    let mut reversed = drivers.clone();
    reversed.reverse();

    assert_eq!(
        engine.find_best_matches(&drivers, &criteria, 10),
        engine.find_best_matches(&reversed, &criteria, 10)
    );
}

#[test]
fn larger_vehicle_serves_smaller_request() {
    let engine = WeightedMatching::default();
    let criteria = seeded_criteria(VehicleType::Motorcycle);
    let van = DriverCandidate::new("van", VehicleType::Van).with_location(point_at_km(4.0));
    let bike = DriverCandidate::new("bike", VehicleType::Bicycle).with_location(point_at_km(4.0));

    assert_eq!(engine.score(&van, &criteria).breakdown.vehicle, 1.0);
    assert!(engine.score(&bike, &criteria).breakdown.vehicle < 1.0);
}

#[test]
fn cost_uses_requested_vehicle_and_urgency() {
    let engine = WeightedMatching::default();
    let driver = driver_at_km("d", 10.0, 4.5, 10);
    let normal = seeded_criteria(VehicleType::Van);
    let urgent = normal.clone().with_urgency(Urgency::Urgent);

    // Van: 5.00 + 10 * 2.00 = 25.00, urgent x1.5 = 37.50
    assert_eq!(engine.score(&driver, &normal).estimated_cost, Some(25.0));
    assert_eq!(engine.score(&driver, &urgent).estimated_cost, Some(37.5));
}

#[test]
fn builder_returns_requested_policy() {
    let weighted = build_matching_algorithm(MatchingAlgorithmType::Weighted, MatchingConfig::default())
        .expect("valid config");
    let nearest = build_matching_algorithm(MatchingAlgorithmType::Nearest, MatchingConfig::default())
        .expect("valid config");
    assert_eq!(weighted.name(), "weighted");
    assert_eq!(nearest.name(), "nearest");

    let invalid = MatchingConfig::default().with_max_radius_km(-1.0);
    assert!(build_matching_algorithm(MatchingAlgorithmType::Weighted, invalid).is_err());
}
