use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::collectors::provider::AircraftObservation;
use crate::collectors::route_lookup::{FlightInfo, RouteLookup};
use crate::core::geo::{bearing, bearing_to_compass, GeoPoint};
use crate::core::mappings::{aircraft_type_name, parse_callsign};
use crate::predictors::approach::closest_approach;

#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("observation has no position")]
    MissingPosition,
    #[error("non-finite position ({lat}, {lon})")]
    InvalidPosition { lat: f64, lon: f64 },
}

/// One nearby flight as served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedFlight {
    pub callsign: String,
    pub raw_callsign: String,
    pub airline_code: Option<String>,
    pub flight_number: Option<String>,
    pub registration: Option<String>,
    pub origin: String,
    pub destination: String,
    pub equipment: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    /// House to aircraft, degrees.
    pub bearing: f64,
    pub direction: &'static str,
    pub current_distance: f64,
    pub closest_distance: f64,
    pub time_to_closest: u64,
    pub is_direct_flyover: bool,
    /// Epoch milliseconds.
    pub last_update: i64,
}

/// Builds the served record for one observation.
///
/// Route lookup only runs for callsigns that resolved to an airline; a
/// failed lookup degrades to "Unknown" instead of failing the record.
pub async fn format_flight<L: RouteLookup>(
    obs: &AircraftObservation,
    house: GeoPoint,
    lookup: &L,
    now_ms: i64,
) -> Result<FormattedFlight, FormatError> {
    let position = obs.position().ok_or(FormatError::MissingPosition)?;
    if !position.is_finite() {
        return Err(FormatError::InvalidPosition {
            lat: position.lat,
            lon: position.lon,
        });
    }

    let raw_callsign = obs.raw_callsign();
    let callsign = parse_callsign(raw_callsign);
    let approach = closest_approach(house, position, obs.track_deg, obs.ground_speed_kt);
    let bearing_deg = bearing(house, position);

    let route = if callsign.airline_code.is_some() && callsign.display_callsign != raw_callsign {
        match lookup.lookup(&callsign.display_callsign).await {
            Ok(info) => info,
            Err(e) => {
                debug!(error = %e, callsign = %callsign.display_callsign, "Route lookup failed");
                FlightInfo::unknown()
            }
        }
    } else {
        FlightInfo::unknown()
    };

    Ok(FormattedFlight {
        callsign: callsign.display_callsign,
        raw_callsign: raw_callsign.trim().to_string(),
        airline_code: callsign.airline_code,
        flight_number: callsign.flight_number,
        registration: obs.registration.clone(),
        origin: route.origin,
        destination: route.destination,
        equipment: aircraft_type_name(obs.aircraft_type.as_deref()),
        latitude: position.lat,
        longitude: position.lon,
        altitude: obs.altitude_ft,
        speed: obs.ground_speed_kt,
        heading: obs.track_deg,
        bearing: bearing_deg,
        direction: bearing_to_compass(bearing_deg),
        current_distance: approach.current_distance,
        closest_distance: approach.closest_distance,
        time_to_closest: approach.time_to_closest_secs(),
        is_direct_flyover: approach.is_direct_flyover,
        last_update: now_ms,
    })
}
