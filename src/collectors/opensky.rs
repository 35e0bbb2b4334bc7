//! OpenSky Network `states/all` adapter.
//!
//! OpenSky returns each aircraft as a positional array (a "state vector")
//! with SI units. Indices used here:
//! 1 callsign, 5 longitude, 6 latitude, 7 barometric altitude (m),
//! 9 velocity (m/s), 10 true track (deg).

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::collectors::provider::{get_text, AircraftObservation, FlightProvider, ProviderError};
use crate::core::geo::GeoPoint;

const OPENSKY_STATES_URL: &str = "https://opensky-network.org/api/states/all";

/// Rough degrees of latitude per statute mile.
const MILES_TO_DEGREES: f64 = 1.0 / 69.0;
const FEET_TO_METERS: f64 = 0.3048;
const METERS_TO_FEET: f64 = 3.28084;
const MPS_TO_KNOTS: f64 = 1.94384;

#[derive(Debug, Deserialize)]
struct StatesResponse {
    states: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lamin: f64,
    pub lomin: f64,
    pub lamax: f64,
    pub lomax: f64,
}

impl BoundingBox {
    /// Square box of `radius_miles` on each side of `center`.
    pub fn around(center: GeoPoint, radius_miles: f64) -> Self {
        let size = radius_miles * MILES_TO_DEGREES;
        Self {
            lamin: center.lat - size,
            lomin: center.lon - size,
            lamax: center.lat + size,
            lomax: center.lon + size,
        }
    }

    fn query(&self) -> [(&'static str, f64); 4] {
        [
            ("lamin", self.lamin),
            ("lomin", self.lomin),
            ("lamax", self.lamax),
            ("lomax", self.lomax),
        ]
    }
}

fn field_f64(state: &[Value], idx: usize) -> Option<f64> {
    state.get(idx).and_then(Value::as_f64)
}

/// Parses a `states/all` body, keeping aircraft with a known barometric
/// altitude below the ceiling.
pub fn parse_states(body: &str, altitude_ceiling_ft: f64) -> Result<Vec<AircraftObservation>, ProviderError> {
    let resp: StatesResponse = serde_json::from_str(body)?;
    let Some(states) = resp.states else {
        debug!("Response carried no state vectors");
        return Ok(Vec::new());
    };

    let ceiling_m = altitude_ceiling_ft * FEET_TO_METERS;
    let observations = states
        .iter()
        .filter_map(|state| {
            let altitude_m = field_f64(state, 7)?;
            if altitude_m >= ceiling_m {
                return None;
            }
            Some(AircraftObservation {
                flight: state.get(1).and_then(Value::as_str).map(str::to_string),
                registration: None,
                aircraft_type: None,
                lat: field_f64(state, 6),
                lon: field_f64(state, 5),
                altitude_ft: Some((altitude_m * METERS_TO_FEET).round()),
                ground_speed_kt: field_f64(state, 9).map(|mps| (mps * MPS_TO_KNOTS).round()),
                track_deg: field_f64(state, 10),
            })
        })
        .collect();
    Ok(observations)
}

pub struct OpenSkyProvider {
    url: String,
    client: reqwest::Client,
}

impl OpenSkyProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            url: OPENSKY_STATES_URL.to_string(),
            client,
        }
    }
}

impl FlightProvider for OpenSkyProvider {
    fn name(&self) -> &'static str {
        "opensky"
    }

    async fn fetch_observations(
        &self,
        center: GeoPoint,
        radius_miles: f64,
        altitude_ceiling_ft: f64,
    ) -> Result<Vec<AircraftObservation>, ProviderError> {
        let bbox = BoundingBox::around(center, radius_miles);
        debug!(provider = self.name(), ?bbox, "Polling provider");
        let request = self.client.get(&self.url).query(&bbox.query());
        let body = get_text(self.name(), request).await?;
        parse_states(&body, altitude_ceiling_ft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "time": 1700000000,
        "states": [
            ["a1b2c3", "UAL456  ", "United States", 1700000000, 1700000000, -74.01, 40.70, 1000.0, false, 100.0, 270.5, -2.5, null, 1050.0, "1200", false, 0],
            ["a1b2c4", "DAL1    ", "United States", 1700000000, 1700000000, -74.02, 40.71, null, true, 0.0, 0.0, null, null, null, null, false, 0],
            ["a1b2c5", "SWA22   ", "United States", 1700000000, 1700000000, -74.03, 40.72, 9000.0, false, 220.0, 10.0, 0.0, null, 9100.0, null, false, 0],
            ["a1b2c6", null, "United States", 1700000000, 1700000000, null, null, 300.0, false, null, null, null, null, null, null, false, 0]
        ]
    }"#;

    #[test]
    fn parses_state_vectors() {
        let obs = parse_states(BODY, 15000.0).unwrap();
        assert_eq!(obs.len(), 2);

        let first = &obs[0];
        assert_eq!(first.flight.as_deref(), Some("UAL456  "));
        assert_eq!(first.lat, Some(40.70));
        assert_eq!(first.lon, Some(-74.01));
        assert_eq!(first.altitude_ft, Some(3281.0));
        assert_eq!(first.ground_speed_kt, Some(194.0));
        assert_eq!(first.track_deg, Some(270.5));
        assert_eq!(first.aircraft_type, None);

        // No position: kept by the adapter, dropped by the poller
        assert_eq!(obs[1].flight, None);
        assert_eq!(obs[1].position(), None);
    }

    #[test]
    fn null_states_is_empty() {
        assert!(parse_states(r#"{"time":1700000000,"states":null}"#, 15000.0).unwrap().is_empty());
    }

    #[test]
    fn bounding_box_is_square_in_degrees() {
        let bbox = BoundingBox::around(GeoPoint::new(40.0, -74.0), 69.0);
        assert!((bbox.lamin - 39.0).abs() < 1e-12);
        assert!((bbox.lamax - 41.0).abs() < 1e-12);
        assert!((bbox.lomin + 75.0).abs() < 1e-12);
        assert!((bbox.lomax + 73.0).abs() < 1e-12);
    }
}
