use crate::core::geo::{bearing, distance, GeoPoint};

/// Statute miles per nautical mile.
pub const KNOTS_TO_MPH: f64 = 1.15078;
/// Closest-approach distance (miles) below which the path counts as overhead.
pub const DIRECT_FLYOVER_MILES: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproachResult {
    /// Distance from the reference point now, in miles.
    pub current_distance: f64,
    /// Projected minimum distance along a straight-line path, in miles.
    pub closest_distance: f64,
    /// Seconds until the closest point, full precision.
    pub time_to_closest: f64,
    pub is_direct_flyover: bool,
}

impl ApproachResult {
    /// Closest point is now: no velocity, or moving away.
    fn stationary(current_distance: f64) -> Self {
        Self {
            current_distance,
            closest_distance: current_distance,
            time_to_closest: 0.0,
            is_direct_flyover: false,
        }
    }

    /// Time to closest approach rounded to whole seconds.
    pub fn time_to_closest_secs(&self) -> u64 {
        self.time_to_closest.round() as u64
    }
}

/// Projects an aircraft's straight-line track past `house` and returns
/// how close it gets and when.
///
/// The path is treated as a straight line on a locally flat patch, which
/// holds at the tens-of-miles radii this is used for. Never fails: bad
/// numeric input comes back as `NaN` / `false`.
pub fn closest_approach(
    house: GeoPoint,
    aircraft: GeoPoint,
    heading_deg: Option<f64>,
    speed_knots: Option<f64>,
) -> ApproachResult {
    let current_distance = distance(house, aircraft);

    let (heading, speed_knots) = match (heading_deg, speed_knots) {
        (Some(heading), Some(speed)) if speed != 0.0 => (heading, speed),
        _ => return ApproachResult::stationary(current_distance),
    };

    let speed_mph = speed_knots * KNOTS_TO_MPH;
    let bearing_to_house = bearing(aircraft, house);

    let diff = (bearing_to_house - heading).abs();
    let angle = diff.min(360.0 - diff);
    if angle > 90.0 {
        return ApproachResult::stationary(current_distance);
    }

    let angle_rad = angle.to_radians();
    let hours = (current_distance / speed_mph) * angle_rad.cos();
    let closest_distance = current_distance * angle_rad.sin();

    ApproachResult {
        current_distance,
        closest_distance,
        time_to_closest: (hours * 3600.0).max(0.0),
        is_direct_flyover: closest_distance < DIRECT_FLYOVER_MILES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::EARTH_RADIUS_MILES;

    const HOUSE: GeoPoint = GeoPoint::new(40.7128, -74.0060);

    fn miles_south(miles: f64) -> GeoPoint {
        let deg = miles / (EARTH_RADIUS_MILES * std::f64::consts::PI / 180.0);
        GeoPoint::new(HOUSE.lat - deg, HOUSE.lon)
    }

    fn assert_stationary(result: ApproachResult) {
        assert_eq!(result.closest_distance, result.current_distance);
        assert_eq!(result.time_to_closest, 0.0);
        assert!(!result.is_direct_flyover);
    }

    #[test]
    fn no_speed_or_heading_is_stationary() {
        let plane = miles_south(10.0);
        assert_stationary(closest_approach(HOUSE, plane, Some(0.0), Some(0.0)));
        assert_stationary(closest_approach(HOUSE, plane, Some(0.0), None));
        assert_stationary(closest_approach(HOUSE, plane, None, Some(250.0)));
    }

    #[test]
    fn flying_away_is_stationary() {
        // South of the house, heading south
        let result = closest_approach(HOUSE, miles_south(10.0), Some(180.0), Some(300.0));
        assert!((result.current_distance - 10.0).abs() < 1e-6);
        assert_stationary(result);
    }

    #[test]
    fn flying_straight_at_house() {
        let result = closest_approach(HOUSE, miles_south(10.0), Some(0.0), Some(300.0));
        assert!(result.closest_distance.abs() < 1e-6);
        assert!(result.is_direct_flyover);
        let expected = 10.0 / (300.0 * KNOTS_TO_MPH) * 3600.0;
        assert!((result.time_to_closest - expected).abs() < 1e-3);
        assert_eq!(result.time_to_closest_secs(), 104);
    }

    #[test]
    fn heading_wraps_across_north() {
        // Bearing to house is 0; heading 350 is 10 degrees off
        let result = closest_approach(HOUSE, miles_south(10.0), Some(350.0), Some(300.0));
        let expected = 10.0 * 10f64.to_radians().sin();
        assert!((result.closest_distance - expected).abs() < 1e-3);
        assert!(!result.is_direct_flyover);
        assert!(result.closest_distance <= result.current_distance);
    }

    #[test]
    fn crossing_path_at_right_angle() {
        // Heading east while the house is due north: closest point is now
        let result = closest_approach(HOUSE, miles_south(3.0), Some(90.0), Some(150.0));
        assert!((result.closest_distance - result.current_distance).abs() < 1e-6);
        assert!(result.time_to_closest < 1.0);
        assert!(result.time_to_closest >= 0.0);
    }

    #[test]
    fn nan_input_does_not_panic() {
        let result = closest_approach(HOUSE, GeoPoint::new(f64::NAN, HOUSE.lon), Some(0.0), Some(100.0));
        assert!(result.current_distance.is_nan());
        assert!(!result.is_direct_flyover);
    }
}
