//! Adapters for services that serve readsb-style `{"ac": [...]}` aircraft
//! lists: airplanes.live and ADS-B Exchange.

use serde::Deserialize;
use tracing::debug;

use crate::collectors::provider::{get_text, AircraftObservation, FlightProvider, ProviderError, MILES_TO_NM};
use crate::core::geo::GeoPoint;

const AIRPLANES_LIVE_URL: &str = "https://api.airplanes.live";
const ADSB_EXCHANGE_URL: &str = "https://globe.adsbexchange.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadsbApi {
    AirplanesLive,
    AdsbExchange,
}

impl ReadsbApi {
    fn name(&self) -> &'static str {
        match self {
            ReadsbApi::AirplanesLive => "airplanes.live",
            ReadsbApi::AdsbExchange => "adsbexchange",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            ReadsbApi::AirplanesLive => AIRPLANES_LIVE_URL,
            ReadsbApi::AdsbExchange => ADSB_EXCHANGE_URL,
        }
    }

    fn url(&self, base: &str, center: GeoPoint, radius_nm: f64) -> String {
        match self {
            ReadsbApi::AirplanesLive => format!("{base}/v2/point/{}/{}/{radius_nm}", center.lat, center.lon),
            ReadsbApi::AdsbExchange => {
                format!("{base}/api/v2/lat/{}/lon/{}/dist/{radius_nm}", center.lat, center.lon)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReadsbResponse {
    ac: Option<Vec<ReadsbAircraft>>,
}

#[derive(Debug, Deserialize)]
struct ReadsbAircraft {
    flight: Option<String>,
    /// Registration
    r: Option<String>,
    /// ICAO type designator
    t: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    alt_baro: Option<AltBaro>,
    gs: Option<f64>,
    track: Option<f64>,
}

/// `alt_baro` is either feet or the string "ground".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AltBaro {
    Feet(f64),
    Marker(String),
}

impl AltBaro {
    fn airborne_feet(&self) -> Option<f64> {
        match self {
            AltBaro::Feet(ft) => Some(*ft),
            AltBaro::Marker(_) => None,
        }
    }
}

/// Parses a readsb body, keeping airborne aircraft below the ceiling.
pub fn parse_readsb(body: &str, altitude_ceiling_ft: f64) -> Result<Vec<AircraftObservation>, ProviderError> {
    let resp: ReadsbResponse = serde_json::from_str(body)?;
    let Some(aircraft) = resp.ac else {
        debug!("Response carried no aircraft list");
        return Ok(Vec::new());
    };

    let observations = aircraft
        .into_iter()
        .filter_map(|ac| {
            let altitude = ac.alt_baro.as_ref().and_then(AltBaro::airborne_feet)?;
            if altitude >= altitude_ceiling_ft {
                return None;
            }
            Some(AircraftObservation {
                flight: ac.flight,
                registration: ac.r,
                aircraft_type: ac.t,
                lat: ac.lat,
                lon: ac.lon,
                altitude_ft: Some(altitude),
                ground_speed_kt: ac.gs,
                track_deg: ac.track,
            })
        })
        .collect();
    Ok(observations)
}

pub struct ReadsbProvider {
    api: ReadsbApi,
    base_url: String,
    client: reqwest::Client,
}

impl ReadsbProvider {
    pub fn new(api: ReadsbApi, client: reqwest::Client) -> Self {
        Self::with_base_url(api, client, api.default_base_url().to_string())
    }

    pub fn with_base_url(api: ReadsbApi, client: reqwest::Client, base_url: String) -> Self {
        Self { api, base_url, client }
    }

    fn build_url(&self, center: GeoPoint, radius_miles: f64) -> String {
        self.api.url(&self.base_url, center, radius_miles * MILES_TO_NM)
    }
}

impl FlightProvider for ReadsbProvider {
    fn name(&self) -> &'static str {
        self.api.name()
    }

    async fn fetch_observations(
        &self,
        center: GeoPoint,
        radius_miles: f64,
        altitude_ceiling_ft: f64,
    ) -> Result<Vec<AircraftObservation>, ProviderError> {
        let url = self.build_url(center, radius_miles);
        debug!(provider = self.name(), %url, "Polling provider");
        let body = get_text(self.name(), self.client.get(&url)).await?;
        parse_readsb(&body, altitude_ceiling_ft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "ac": [
            {"hex":"a1b2c3","flight":"AAL123  ","r":"N123AA","t":"B738","lat":40.70,"lon":-74.01,"alt_baro":3500,"gs":210.4,"track":45.0},
            {"hex":"a1b2c4","flight":"N5555","lat":40.71,"lon":-74.02,"alt_baro":"ground","gs":0},
            {"hex":"a1b2c5","flight":"DAL9","lat":40.72,"lon":-74.03,"alt_baro":36000,"gs":450,"track":90},
            {"hex":"a1b2c6","r":"N777","lat":null,"lon":-74.04,"alt_baro":1200},
            {"hex":"a1b2c7","flight":"SWA1","lat":40.73,"lon":-74.05}
        ],
        "msg":"No error","now":1700000000000,"total":5
    }"#;

    #[test]
    fn parses_and_filters_aircraft() {
        let obs = parse_readsb(BODY, 15000.0).unwrap();
        assert_eq!(obs.len(), 2);

        assert_eq!(obs[0].flight.as_deref(), Some("AAL123  "));
        assert_eq!(obs[0].registration.as_deref(), Some("N123AA"));
        assert_eq!(obs[0].aircraft_type.as_deref(), Some("B738"));
        assert_eq!(obs[0].altitude_ft, Some(3500.0));
        assert_eq!(obs[0].ground_speed_kt, Some(210.4));
        assert_eq!(obs[0].track_deg, Some(45.0));

        // Missing latitude survives the adapter; the poller drops it
        assert_eq!(obs[1].registration.as_deref(), Some("N777"));
        assert_eq!(obs[1].lat, None);
    }

    #[test]
    fn missing_aircraft_list_is_empty() {
        assert!(parse_readsb(r#"{"msg":"No error"}"#, 15000.0).unwrap().is_empty());
        assert!(parse_readsb(r#"{"ac":null}"#, 15000.0).unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(matches!(parse_readsb("<html>", 15000.0), Err(ProviderError::Decode(_))));
    }

    #[test]
    fn builds_urls_in_nautical_miles() {
        let center = GeoPoint::new(40.5, -74.25);
        let live = ReadsbProvider::new(ReadsbApi::AirplanesLive, reqwest::Client::new());
        let url = live.build_url(center, 10.0);
        assert!(url.starts_with("https://api.airplanes.live/v2/point/40.5/-74.25/8.6897"), "{url}");

        let adsbx = ReadsbProvider::new(ReadsbApi::AdsbExchange, reqwest::Client::new());
        let url = adsbx.build_url(center, 10.0);
        assert!(url.starts_with("https://globe.adsbexchange.com/api/v2/lat/40.5/lon/-74.25/dist/8.6897"), "{url}");
        assert_eq!(adsbx.name(), "adsbexchange");
    }

    #[tokio::test]
    async fn fetches_from_injected_base_url() {
        use crate::collectors::provider::tests::serve_locally;
        use axum::http::{StatusCode, Uri};

        let router = axum::Router::new().fallback(|uri: Uri| async move {
            if uri.path().starts_with("/v2/point/40.5/-74.25/") {
                (StatusCode::OK, BODY)
            } else {
                (StatusCode::NOT_FOUND, "")
            }
        });
        let base = serve_locally(router).await;
        let provider = ReadsbProvider::with_base_url(ReadsbApi::AirplanesLive, reqwest::Client::new(), base);

        let obs = provider
            .fetch_observations(GeoPoint::new(40.5, -74.25), 5.0, 15000.0)
            .await
            .unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].raw_callsign(), "AAL123  ");
    }

    #[tokio::test]
    async fn error_status_from_provider() {
        use crate::collectors::provider::tests::serve_locally;
        use axum::http::StatusCode;

        let router = axum::Router::new().fallback(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") });
        let base = serve_locally(router).await;
        let provider = ReadsbProvider::with_base_url(ReadsbApi::AdsbExchange, reqwest::Client::new(), base);

        let err = provider
            .fetch_observations(GeoPoint::new(40.5, -74.25), 5.0, 15000.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Status { provider: "adsbexchange", .. }));
    }
}
