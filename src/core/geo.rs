/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Geographic position in decimal degrees (WGS84, no datum conversion).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// Great-circle distance in statute miles (haversine).
pub fn distance(p1: GeoPoint, p2: GeoPoint) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lon = (p2.lon - p1.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Initial bearing from `from` to `to`, degrees in [0, 360).
pub fn bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Buckets a bearing into one of 8 compass points. Ties at sector
/// boundaries go to the higher sector, 360 maps to "N".
pub fn bearing_to_compass(bearing: f64) -> &'static str {
    let index = ((bearing / 45.0).round() as i64).rem_euclid(8) as usize;
    COMPASS_POINTS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUSE: GeoPoint = GeoPoint::new(40.7128, -74.0060);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance(HOUSE, HOUSE), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let lax = GeoPoint::new(33.9425, -118.4081);
        let jfk = GeoPoint::new(40.6413, -73.7781);
        assert!((distance(lax, jfk) - distance(jfk, lax)).abs() < 1e-9);
        // LAX to JFK is roughly 2475 statute miles
        assert!((distance(lax, jfk) - 2475.0).abs() < 10.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let north = GeoPoint::new(HOUSE.lat + 1.0, HOUSE.lon);
        let expected = EARTH_RADIUS_MILES * std::f64::consts::PI / 180.0;
        assert!((distance(HOUSE, north) - expected).abs() < 1e-9);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let north = GeoPoint::new(HOUSE.lat + 0.1, HOUSE.lon);
        let south = GeoPoint::new(HOUSE.lat - 0.1, HOUSE.lon);
        let east = GeoPoint::new(HOUSE.lat, HOUSE.lon + 0.1);
        let west = GeoPoint::new(HOUSE.lat, HOUSE.lon - 0.1);

        assert!(bearing(HOUSE, north).abs() < 1e-9);
        assert!((bearing(HOUSE, south) - 180.0).abs() < 1e-9);
        assert!((bearing(HOUSE, east) - 90.0).abs() < 0.1);
        assert!((bearing(HOUSE, west) - 270.0).abs() < 0.1);
    }

    #[test]
    fn bearing_stays_in_range() {
        // Westward and southward targets produce negative atan2 values
        for (dlat, dlon) in [(-0.5, -0.5), (0.5, -0.5), (-0.01, -1.0), (0.0, -0.0001), (1.0, 0.0)] {
            let to = GeoPoint::new(HOUSE.lat + dlat, HOUSE.lon + dlon);
            let b = bearing(HOUSE, to);
            assert!((0.0..360.0).contains(&b), "bearing {b} out of range");
        }
    }

    #[test]
    fn compass_points() {
        assert_eq!(bearing_to_compass(0.0), "N");
        assert_eq!(bearing_to_compass(44.0), "NE");
        assert_eq!(bearing_to_compass(22.4), "N");
        assert_eq!(bearing_to_compass(22.5), "NE");
        assert_eq!(bearing_to_compass(180.0), "S");
        assert_eq!(bearing_to_compass(337.5), "N");
        assert_eq!(bearing_to_compass(359.0), "N");
        assert_eq!(bearing_to_compass(360.0), "N");
    }
}
