//! Arrival estimates from straight-line distance.

/// Assumed average urban speed for arrival estimates (km/h).
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 30.0;

/// Lower bound on any nonzero arrival estimate (minutes).
pub const MIN_ARRIVAL_MINUTES: u32 = 1;

/// Estimate minutes until a driver `distance_km` away reaches the pickup.
///
/// Rounds to whole minutes; a nonzero distance never yields less than
/// [`MIN_ARRIVAL_MINUTES`]. A driver already at the pickup arrives in 0 minutes.
pub fn estimate_arrival_minutes(distance_km: f64, average_speed_kmh: f64) -> u32 {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return 0;
    }
    let speed = if average_speed_kmh.is_finite() && average_speed_kmh > 0.0 {
        average_speed_kmh
    } else {
        DEFAULT_AVERAGE_SPEED_KMH
    };
    let minutes = (distance_km / speed * 60.0).round();
    if minutes >= u32::MAX as f64 {
        return u32::MAX;
    }
    (minutes as u32).max(MIN_ARRIVAL_MINUTES)
}
